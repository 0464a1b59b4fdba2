use rust_decimal::Decimal;

use crate::error::{RedeError, Result};
use crate::fmt::{brl, decimal_br};
use crate::models::{AggregatedRecord, Column, FieldValue};

pub struct DisplayRow {
    pub establishment: String,
    pub cells: Vec<String>,
}

/// Human-readable copy of the purchase-order table. The records it was built
/// from are left numeric.
pub struct Rendered {
    pub headers: Vec<&'static str>,
    pub rows: Vec<DisplayRow>,
    pub total: Decimal,
    pub total_label: String,
}

pub fn render(records: &[AggregatedRecord], schema: &[Column]) -> Result<Rendered> {
    let total = records
        .iter()
        .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(r.amount))
        .ok_or_else(|| RedeError::AmountOverflow("report total".to_string()))?;

    let rows = records
        .iter()
        .map(|record| DisplayRow {
            establishment: record.establishment.clone(),
            cells: schema
                .iter()
                .map(|col| match record.field(*col) {
                    FieldValue::Text(s) => s.to_string(),
                    FieldValue::Amount(d) => decimal_br(d),
                })
                .collect(),
        })
        .collect();

    Ok(Rendered {
        headers: schema.iter().map(Column::name).collect(),
        rows,
        total,
        total_label: brl(total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(cost_center: &str, establishment: &str, amount: Decimal) -> AggregatedRecord {
        AggregatedRecord {
            cost_center: cost_center.to_string(),
            establishment: establishment.to_string(),
            amount,
            invoice_cnpj: "08845676000198".to_string(),
            purchase_type: "4".to_string(),
            aggregator_code: "001".to_string(),
            supplier_cnpj: "33264655000126".to_string(),
            product_code: "06000004".to_string(),
            quantity: "1".to_string(),
            delivery_label: "30/06/2025".to_string(),
            account_item: "103".to_string(),
            value_class: "81000".to_string(),
            observation: "Observação padrão".to_string(),
            freight_value: "0".to_string(),
            approval_group: "PC0012".to_string(),
        }
    }

    #[test]
    fn test_total_is_exact_sum() {
        let records = vec![
            record("CC1", "Loja A", dec!(0.10)),
            record("CC1", "Loja B", dec!(0.20)),
            record("", "Loja C", dec!(1200.005)),
        ];
        let rendered = render(&records, &Column::ALL).unwrap();
        assert_eq!(rendered.total, dec!(1200.305));
        assert_eq!(rendered.total_label, "R$ 1.200,30");
    }

    #[test]
    fn test_display_rows_format_amount_column() {
        let records = vec![record("CC1", "Loja A", dec!(1500.50))];
        let rendered = render(&records, &Column::ALL).unwrap();
        assert_eq!(rendered.headers.len(), 14);
        let row = &rendered.rows[0];
        assert_eq!(row.establishment, "Loja A");
        assert_eq!(row.cells[6], "1.500,50");
        assert_eq!(row.cells[8], "CC1");
        assert_eq!(row.cells[0], "08845676000198");
        // Source records keep the numeric amount.
        assert_eq!(records[0].amount, dec!(1500.50));
    }

    #[test]
    fn test_empty_input_totals_zero() {
        let rendered = render(&[], &Column::ALL).unwrap();
        assert!(rendered.rows.is_empty());
        assert_eq!(rendered.total_label, "R$ 0,00");
    }

    #[test]
    fn test_custom_schema_projection() {
        let records = vec![record("CC7", "Loja A", dec!(3))];
        let rendered = render(&records, &[Column::CodCentroCustos, Column::VlrUnitario]).unwrap();
        assert_eq!(rendered.headers, vec!["CodCentroCustos", "VlrUnitario"]);
        assert_eq!(rendered.rows[0].cells, vec!["CC7", "3,00"]);
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let records = vec![
            record("CC1", "Loja A", Decimal::MAX),
            record("CC2", "Loja B", dec!(1)),
        ];
        assert!(matches!(
            render(&records, &Column::ALL),
            Err(RedeError::AmountOverflow(_))
        ));
    }
}
