//! Selected drug models.

use serde::{Deserialize, Serialize};

use super::{ResultKind, SearchResult};

/// A drug product the user added to their list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Drug {
    /// CIS code - unique identifier in the reference catalog
    pub cis: String,
    /// Display name (e.g., "Doliprane 1000mg")
    pub name: String,
    /// Active substances in the product
    #[serde(default)]
    pub substances: Vec<Substance>,
}

/// An active substance inside a drug product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Substance {
    /// Substance code
    pub code: String,
    /// Substance name (e.g., "paracétamol")
    pub name: String,
    /// Dose as printed on the label (e.g., "1000 mg")
    pub dose: Option<String>,
}

impl Drug {
    /// Create a drug with no known composition.
    pub fn new(cis: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            cis: cis.into(),
            name: name.into(),
            substances: Vec::new(),
        }
    }

    /// Add a substance to the composition.
    pub fn with_substance(mut self, substance: Substance) -> Self {
        self.substances.push(substance);
        self
    }
}

impl From<&SearchResult> for Drug {
    fn from(result: &SearchResult) -> Self {
        let mut drug = Drug::new(result.id.clone(), result.name.clone());
        // A substance hit is its own single-substance composition
        if result.kind == ResultKind::Substance {
            drug.substances.push(Substance {
                code: result.id.clone(),
                name: result.name.clone(),
                dose: None,
            });
        }
        drug
    }
}
