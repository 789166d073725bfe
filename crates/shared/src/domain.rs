use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SiteError;

macro_rules! key_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

key_newtype!(PageId);
key_newtype!(SolutionId);

impl PageId {
    /// Parses a URL fragment (with or without the leading `#`) into a page id.
    /// Empty fragments yield `None`.
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        let raw = fragment.strip_prefix('#').unwrap_or(fragment).trim();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub image: String,
    pub title: String,
    #[serde(alias = "desc")]
    pub description: String,
}

impl Product {
    pub fn new(
        image: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            image: image.into(),
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Non-empty, immutable list of products addressed by cyclic index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProductCatalog(Vec<Product>);

impl ProductCatalog {
    pub fn new(products: Vec<Product>) -> Result<Self, SiteError> {
        if products.is_empty() {
            return Err(SiteError::EmptyCatalog);
        }
        Ok(Self(products))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Product> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.0.iter()
    }

    /// Maps any integer onto `[0, len)` by modular wraparound.
    pub fn normalize(&self, index: i64) -> usize {
        normalize_index(index, self.0.len())
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self(vec![
            Product::new(
                "product/prd1.jpg",
                "标准组件",
                "高效能标准钙钛矿组件，适用于各类建筑幕墙",
            ),
            Product::new("product/prd2.jpg", "炫彩组件", "多彩化设计，兼顾美观与发电效能"),
            Product::new(
                "product/prd3.jpg",
                "BIPV透光系列",
                "透光设计，满足室内采光需求同时发电",
            ),
            Product::new(
                "product/prd4.jpg",
                "BIPV仿石材系列",
                "仿石材外观，自然质感与绿色能源完美结合",
            ),
        ])
    }
}

impl<'de> Deserialize<'de> for ProductCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let products = Vec::<Product>::deserialize(deserializer)?;
        Self::new(products).map_err(serde::de::Error::custom)
    }
}

/// `((index % len) + len) % len`; a zero length maps everything to 0.
pub fn normalize_index(index: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as i64;
    (((index % len) + len) % len) as usize
}
