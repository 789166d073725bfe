use serde::{Deserialize, Serialize};
use shared::domain::{PageId, SolutionId};

/// What the host markup contains, as discovered by the driver.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteLayout {
    pub pages: Vec<PageId>,
    pub solutions: Vec<SolutionId>,
    pub has_solution_panels: bool,
    pub roadmap_steps: usize,
    pub product_buttons: usize,
    pub has_product_image: bool,
    pub construction_items: usize,
}

impl SiteLayout {
    /// Markup of the shipped showcase page.
    pub fn standard() -> Self {
        Self {
            pages: ["home", "solutions", "roadmap", "operations", "about"]
                .into_iter()
                .map(PageId::from)
                .collect(),
            solutions: ["efficiency", "stability", "aesthetics", "cost"]
                .into_iter()
                .map(SolutionId::from)
                .collect(),
            has_solution_panels: true,
            roadmap_steps: 5,
            product_buttons: 4,
            has_product_image: true,
            construction_items: 3,
        }
    }
}
