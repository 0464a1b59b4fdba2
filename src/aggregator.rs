use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{RedeError, Result};
use crate::models::{AggregatedRecord, RawCell, Sheet};
use crate::normalizer::{normalize, DotPolicy};
use crate::profile::{ErpConstants, Profile};

pub const DEFAULT_OBSERVATION: &str = "Observação padrão";

const FEE_TABLE: &str = "fee report";
const DIM_TABLE: &str = "cost-center table";

/// Operator-supplied values for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParams {
    pub delivery_date: NaiveDate,
    pub observation: String,
}

impl RunParams {
    pub fn new(delivery_date: NaiveDate, observation: &str) -> Self {
        let observation = match observation.trim() {
            "" => DEFAULT_OBSERVATION.to_string(),
            obs => obs.to_string(),
        };
        Self {
            delivery_date,
            observation,
        }
    }

    pub fn delivery_label(&self) -> String {
        self.delivery_date.format("%d/%m/%Y").to_string()
    }
}

/// Everything the aggregator needs, resolved up front.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub profile: Profile,
    pub erp: ErpConstants,
    pub dot_policy: DotPolicy,
    pub params: RunParams,
}

fn require(sheet: &Sheet, table: &'static str, column: &str) -> Result<usize> {
    sheet.column(column).ok_or_else(|| RedeError::MissingColumn {
        table,
        column: column.to_string(),
    })
}

static EMPTY: RawCell = RawCell::Empty;

fn cell(row: &[RawCell], idx: usize) -> &RawCell {
    row.get(idx).unwrap_or(&EMPTY)
}

/// Index the dimension table: tax identifier to every cost center listed
/// for it, in sheet order.
fn cost_centers(dims: &Sheet, profile: &Profile) -> Result<HashMap<String, Vec<String>>> {
    let key_idx = require(dims, DIM_TABLE, &profile.join_key)?;
    let cc_idx = require(dims, DIM_TABLE, &profile.cost_center_column)?;

    let mut index: HashMap<String, Vec<String>> = HashMap::new();
    for row in &dims.rows {
        let key = cell(row, key_idx).as_text();
        if key.is_empty() {
            continue;
        }
        index
            .entry(key)
            .or_default()
            .push(cell(row, cc_idx).as_text());
    }
    Ok(index)
}

/// Join fee rows to their cost centers, sum per (cost center, establishment)
/// and lay the groups out as purchase-order lines.
pub fn aggregate(fees: &Sheet, dims: &Sheet, config: &RunConfig) -> Result<Vec<AggregatedRecord>> {
    let profile = &config.profile;
    let key_idx = require(fees, FEE_TABLE, &profile.join_key)?;
    let est_idx = require(fees, FEE_TABLE, &profile.establishment_column)?;
    let amount_idx = require(fees, FEE_TABLE, &profile.amount_column)?;
    let index = cost_centers(dims, profile)?;

    let mut groups: Vec<((String, String), Decimal)> = Vec::new();
    let mut positions: HashMap<(String, String), usize> = HashMap::new();
    let mut add = |cost_center: String, establishment: &str, amount: Decimal| -> Result<()> {
        let key = (cost_center, establishment.to_string());
        match positions.get(&key) {
            Some(&pos) => {
                let sum = &mut groups[pos].1;
                *sum = sum.checked_add(amount).ok_or_else(|| {
                    RedeError::AmountOverflow(format!("group {} / {}", key.0, key.1))
                })?;
            }
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push((key, amount));
            }
        }
        Ok(())
    };

    let mut unmatched = 0usize;
    for row in &fees.rows {
        if row.iter().all(RawCell::is_empty) {
            continue;
        }
        let tax_id = cell(row, key_idx).as_text();
        let establishment = cell(row, est_idx).as_text();
        let amount = normalize(cell(row, amount_idx), config.dot_policy);

        match index.get(&tax_id) {
            Some(centers) => {
                for cc in centers {
                    add(cc.clone(), &establishment, amount)?;
                }
            }
            None => {
                tracing::debug!(cnpj = %tax_id, establishment = %establishment, "no cost center for tax id");
                unmatched += 1;
                add(String::new(), &establishment, amount)?;
            }
        }
    }

    tracing::info!(
        profile = %profile.key,
        fee_rows = fees.rows.len(),
        groups = groups.len(),
        unmatched,
        "aggregated fee report"
    );

    let erp = &config.erp;
    let delivery_label = config.params.delivery_label();
    Ok(groups
        .into_iter()
        .map(|((cost_center, establishment), amount)| AggregatedRecord {
            cost_center,
            establishment,
            amount,
            invoice_cnpj: erp.invoice_cnpj.clone(),
            purchase_type: erp.purchase_type.clone(),
            aggregator_code: erp.aggregator_code.clone(),
            supplier_cnpj: erp.supplier_cnpj.clone(),
            product_code: erp.product_code.clone(),
            quantity: erp.quantity.clone(),
            delivery_label: delivery_label.clone(),
            account_item: erp.account_item.clone(),
            value_class: erp.value_class.clone(),
            observation: config.params.observation.clone(),
            freight_value: erp.freight_value.clone(),
            approval_group: erp.approval_group.clone(),
        })
        .collect())
}
