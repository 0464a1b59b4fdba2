use serde::{Deserialize, Serialize};

use crate::error::{RedeError, Result};
use crate::models::Column;

// ---------------------------------------------------------------------------
// Profile kinds: the deployment variants of the fee report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfileKind {
    Rede,
    Unitario,
}

impl ProfileKind {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Rede => "rede",
            Self::Unitario => "unitario",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Rede => "Relatório REDE (coluna taxa)",
            Self::Unitario => "Relatório com VlrUnitario",
        }
    }

    pub fn amount_column(&self) -> &'static str {
        match self {
            Self::Rede => "taxa",
            Self::Unitario => "VlrUnitario",
        }
    }

    pub fn cost_center_column(&self) -> &'static str {
        match self {
            Self::Rede => "CENTRO DE CUSTO (NOVO)",
            Self::Unitario => "CodCentroCustos",
        }
    }

    pub fn profile(&self) -> Profile {
        Profile {
            key: self.key().to_string(),
            join_key: "CNPJ".to_string(),
            establishment_column: "Estabelecimento".to_string(),
            amount_column: self.amount_column().to_string(),
            cost_center_column: self.cost_center_column().to_string(),
            fee_header_row: 1,
            dim_header_row: 0,
            output_schema: Column::ALL.to_vec(),
        }
    }
}

pub const ALL_PROFILES: &[ProfileKind] = &[ProfileKind::Rede, ProfileKind::Unitario];

pub fn get_by_key(key: &str) -> Result<Profile> {
    ALL_PROFILES
        .iter()
        .find(|p| p.key() == key)
        .map(|p| p.profile())
        .ok_or_else(|| RedeError::UnknownProfile(key.to_string()))
}

/// Column names and layout for one run of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub key: String,
    pub join_key: String,
    pub establishment_column: String,
    pub amount_column: String,
    /// Column of the dimension table holding the cost-center code.
    pub cost_center_column: String,
    /// Sheet row holding the fee report's labels; rows above it are a title.
    pub fee_header_row: usize,
    pub dim_header_row: usize,
    pub output_schema: Vec<Column>,
}

// ---------------------------------------------------------------------------
// ERP constants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErpConstants {
    pub invoice_cnpj: String,
    pub purchase_type: String,
    pub aggregator_code: String,
    pub supplier_cnpj: String,
    pub product_code: String,
    pub quantity: String,
    pub account_item: String,
    pub value_class: String,
    pub freight_value: String,
    pub approval_group: String,
}

impl Default for ErpConstants {
    fn default() -> Self {
        Self {
            invoice_cnpj: "08845676000198".to_string(),
            purchase_type: "4".to_string(),
            aggregator_code: "001".to_string(),
            supplier_cnpj: "33264655000126".to_string(),
            product_code: "06000004".to_string(),
            quantity: "1".to_string(),
            account_item: "103".to_string(),
            value_class: "81000".to_string(),
            freight_value: "0".to_string(),
            approval_group: "PC0012".to_string(),
        }
    }
}
