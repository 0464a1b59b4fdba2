use rust_decimal::Decimal;

/// A single spreadsheet cell as handed over by the sheet readers, before any
/// interpretation of its contents.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl RawCell {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Canonical text used for join keys, header labels and passthrough
    /// fields. Integral floats drop their fractional part so a CNPJ stored as
    /// a number in Excel compares equal to the same CNPJ typed as text.
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", *f as i64)
            }
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.trim().to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for RawCell {
    fn from(s: &str) -> Self {
        if s.trim().is_empty() {
            Self::Empty
        } else {
            Self::Text(s.to_string())
        }
    }
}

/// An in-memory table: header labels plus the data rows beneath them.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

impl Sheet {
    /// Build a sheet from raw rows, taking `header_row` as the label row and
    /// discarding everything above it.
    pub fn from_rows(mut rows: Vec<Vec<RawCell>>, header_row: usize) -> Self {
        if header_row >= rows.len() {
            return Self::default();
        }
        let data = rows.split_off(header_row + 1);
        let headers = rows
            .pop()
            .unwrap_or_default()
            .iter()
            .map(RawCell::as_text)
            .collect();
        Self { headers, rows: data }
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers.iter().position(|h| h == name)
    }
}

// ---------------------------------------------------------------------------
// Output schema
// ---------------------------------------------------------------------------

/// Columns of the ERP purchase-order layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    CnpjNotaFiscal,
    TipoCompra,
    Agregador,
    CnpjFornecedor,
    CodProduto,
    Quantidade,
    VlrUnitario,
    PrevisaoEntrega,
    CodCentroCustos,
    ItemConta,
    ClasseValor,
    Obs,
    VlrFrete,
    GrupoAprovacao,
}

impl Column {
    pub const ALL: [Column; 14] = [
        Column::CnpjNotaFiscal,
        Column::TipoCompra,
        Column::Agregador,
        Column::CnpjFornecedor,
        Column::CodProduto,
        Column::Quantidade,
        Column::VlrUnitario,
        Column::PrevisaoEntrega,
        Column::CodCentroCustos,
        Column::ItemConta,
        Column::ClasseValor,
        Column::Obs,
        Column::VlrFrete,
        Column::GrupoAprovacao,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::CnpjNotaFiscal => "CNPJNotaFiscal",
            Self::TipoCompra => "TipoCompra",
            Self::Agregador => "Agregador",
            Self::CnpjFornecedor => "CNPJFornecedor",
            Self::CodProduto => "CodProduto",
            Self::Quantidade => "Quantidade",
            Self::VlrUnitario => "VlrUnitario",
            Self::PrevisaoEntrega => "PrevisaoEntrega",
            Self::CodCentroCustos => "CodCentroCustos",
            Self::ItemConta => "ItemConta",
            Self::ClasseValor => "ClasseValor",
            Self::Obs => "Obs",
            Self::VlrFrete => "VlrFrete",
            Self::GrupoAprovacao => "GrupoAprovacao",
        }
    }
}

/// A field as exporters see it. The amount stays numeric so every output
/// target decides once how to render it.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Amount(Decimal),
}

/// One purchase-order line: the summed fees of an establishment within a
/// cost center, plus the ERP constants.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRecord {
    pub cost_center: String,
    pub establishment: String,
    pub amount: Decimal,
    pub invoice_cnpj: String,
    pub purchase_type: String,
    pub aggregator_code: String,
    pub supplier_cnpj: String,
    pub product_code: String,
    pub quantity: String,
    pub delivery_label: String,
    pub account_item: String,
    pub value_class: String,
    pub observation: String,
    pub freight_value: String,
    pub approval_group: String,
}

impl AggregatedRecord {
    pub fn field(&self, column: Column) -> FieldValue<'_> {
        let text = match column {
            Column::VlrUnitario => return FieldValue::Amount(self.amount),
            Column::CnpjNotaFiscal => &self.invoice_cnpj,
            Column::TipoCompra => &self.purchase_type,
            Column::Agregador => &self.aggregator_code,
            Column::CnpjFornecedor => &self.supplier_cnpj,
            Column::CodProduto => &self.product_code,
            Column::Quantidade => &self.quantity,
            Column::PrevisaoEntrega => &self.delivery_label,
            Column::CodCentroCustos => &self.cost_center,
            Column::ItemConta => &self.account_item,
            Column::ClasseValor => &self.value_class,
            Column::Obs => &self.observation,
            Column::VlrFrete => &self.freight_value,
            Column::GrupoAprovacao => &self.approval_group,
        };
        FieldValue::Text(text)
    }
}
