//! OpenSASE Variants - configurator demo
//!
//! Usage: `opensase-variants [product.json] [dimension=option_id ...]`

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;
use opensase_variants::{
    telemetry, Configurator, ConfiguratorSession, CurrencyService, Dimension, EngineConfig, ProductRecord,
    TemplateCatalog, VariantHierarchy,
};

const SAMPLE_PRODUCT: &str = r#"{
  "id": "iphone-15",
  "name": "iPhone 15",
  "price": 104000,
  "variants": [
    { "id": "midnight", "name": "Midnight", "stock": 6, "bestseller": true,
      "storageOptions": [
        { "id": "midnight-128", "name": "128GB", "price": 104500, "stock": 4,
          "networkOptions": [
            { "id": "midnight-128-vz", "name": "Verizon", "price": 104500, "stock": 3,
              "conditionOptions": [
                { "id": "midnight-128-vz-new", "name": "Brand New", "price": 109000, "stock": 2 },
                { "id": "midnight-128-vz-ref", "name": "Refurbished", "price": 91000, "stock": 1 } ] },
            { "id": "midnight-128-unl", "name": "Unlocked", "price": 112000, "stock": 0 } ] },
        { "id": "midnight-256", "name": "256GB", "price": 118000, "stock": 0 } ] },
    { "id": "pink", "name": "Pink", "stock": 0, "limited": true,
      "storageOptions": [ { "id": "pink-128", "name": "128GB", "price": 104500, "stock": 0 } ] }
  ]
}"#;

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();
    let config = EngineConfig::from_env()?;

    let mut selections = Vec::new();
    let mut record_json = SAMPLE_PRODUCT.to_string();
    for arg in std::env::args().skip(1) {
        match arg.split_once('=') {
            Some((dimension, option_id)) => selections.push((dimension.parse::<Dimension>().map_err(anyhow::Error::msg)?, option_id.to_string())),
            None => record_json = std::fs::read_to_string(&arg).with_context(|| format!("reading {}", arg))?,
        }
    }
    let record: ProductRecord = serde_json::from_str(&record_json).context("parsing product record")?;
    let hierarchy = Arc::new(VariantHierarchy::from_record(record));

    let currency = CurrencyService::new(config.rate_provider()?, config.rate_table()?);
    let rate = currency.fetch_live_rate().await;
    tracing::info!(%rate, live = currency.table().is_live(), "Exchange rate ready");

    let mut session = ConfiguratorSession::new(hierarchy, config.decay.clone());
    for (dimension, option_id) in &selections {
        if !session.select_option(*dimension, option_id) {
            tracing::warn!(%dimension, option_id = %option_id, "Selection ignored");
        }
    }

    let product = session.configurator().hierarchy();
    println!("{} ({})", product.name, product.product_id);
    for option in session.configurator().selected_options() {
        println!("  {:<10} {}", option.id, option.display_name);
    }
    if let Some(range) = product.price_range() {
        println!("price range: {} - {}", range.min, range.max);
    }
    for shown in &config.display_currencies {
        match session.formatted_price(&currency, shown) {
            Ok(price) => println!("price [{}]: {}", shown, price),
            Err(e) => tracing::warn!(currency = %shown, error = %e, "Cannot format price"),
        }
    }
    println!("stock: {}", session.stock_signal().message());

    let catalog = TemplateCatalog::builtin();
    let (name, fields) = sku_inputs(session.configurator());
    println!("sku: {}", catalog.get("smartphone").generate_sku(&name, &fields));
    Ok(())
}

/// Color name plus smartphone template fields taken from the current selection.
/// Dimensions the product omits never enter the map, so they stay out of the SKU.
fn sku_inputs(configurator: &Configurator) -> (String, HashMap<String, String>) {
    let mut name = String::new();
    let mut fields = HashMap::new();
    let selected = configurator.selection().entries().iter().zip(configurator.selected_options());
    for ((dimension, _), option) in selected {
        let value = option.display_name.clone();
        match dimension {
            Dimension::Color => name = value,
            Dimension::Storage => { fields.insert("storage".to_string(), value); }
            Dimension::Network => { fields.insert("networkStatus".to_string(), value); }
            Dimension::Condition => { fields.insert("productGrade".to_string(), value); }
        }
    }
    (name, fields)
}
