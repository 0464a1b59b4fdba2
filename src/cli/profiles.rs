use comfy_table::Table;

use crate::profile::ALL_PROFILES;
use crate::settings::load_settings;

pub fn run() {
    let default = load_settings().default_profile;
    let mut table = Table::new();
    table.set_header(vec!["Key", "Description", "Amount column", "Cost-center column"]);
    for kind in ALL_PROFILES {
        let key = if kind.key() == default {
            format!("{} *", kind.key())
        } else {
            kind.key().to_string()
        };
        table.add_row(vec![
            key,
            kind.name().to_string(),
            kind.amount_column().to_string(),
            kind.cost_center_column().to_string(),
        ]);
    }
    println!("{table}");
}
