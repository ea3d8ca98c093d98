use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use opensase_variants::services::currency::{ExchangeRateTable, RateFetchError, RateProvider};
use opensase_variants::services::seller::{SellerVariant, StoreError, VariantPriceStore};
use opensase_variants::services::stock_decay::DecayConfig;
use opensase_variants::{
    ConfiguratorSession, Currency, CurrencyService, Dimension, PriceEditor, ProductRecord, StockSignal,
    TemplateCatalog, VariantHierarchy,
};

struct OfflineProvider;

#[async_trait]
impl RateProvider for OfflineProvider {
    async fn fetch_rate(&self, _from: &Currency, _to: &Currency) -> Result<Decimal, RateFetchError> {
        Err(RateFetchError::Unavailable("connection refused".into()))
    }
}

struct FixedProvider(Decimal);

#[async_trait]
impl RateProvider for FixedProvider {
    async fn fetch_rate(&self, _from: &Currency, _to: &Currency) -> Result<Decimal, RateFetchError> { Ok(self.0) }
}

#[derive(Default)]
struct RecordingStore { writes: Mutex<Vec<(String, Decimal)>> }

#[async_trait]
impl VariantPriceStore for RecordingStore {
    async fn update_variant_price(&self, variant_id: &str, new_price: Decimal) -> Result<(), StoreError> {
        self.writes.lock().unwrap().push((variant_id.to_string(), new_price));
        Ok(())
    }
}

fn phone() -> Arc<VariantHierarchy> {
    let record: ProductRecord = serde_json::from_value(serde_json::json!({
        "id": "iphone-15",
        "name": "iPhone 15",
        "price": 100000,
        "stock": 10,
        "variants": [
            { "id": "pink", "name": "Pink", "stock": 0,
              "storageOptions": [{ "id": "pink-128", "name": "128GB", "price": 104500, "stock": 0 }] },
            { "id": "midnight", "name": "Midnight",
              "storageOptions": [
                { "id": "m-128", "name": "128GB", "price": 104500,
                  "networkOptions": [
                    { "id": "m-128-unl", "name": "Unlocked", "price": 112000, "stock": 0 },
                    { "id": "m-128-vz", "name": "Verizon", "price": 105000, "stock": 3,
                      "conditionOptions": [
                        { "id": "m-128-vz-new", "name": "Brand New", "price": 109000, "stock": 2 },
                        { "id": "m-128-vz-ref", "name": "Refurbished", "price": 91000, "stock": 1 }
                      ] }
                  ] },
                { "id": "m-256", "name": "256GB", "price": 118000, "stock": 0, "active": false }
              ] }
        ]
    })).unwrap();
    Arc::new(VariantHierarchy::from_record(record))
}

#[tokio::test]
async fn test_full_configuration_flow() {
    let mut session = ConfiguratorSession::new(phone(), DecayConfig::default());

    // Pink has no stock anywhere, so defaults walk down the Midnight branch.
    let path: Vec<&str> = session.selection().entries().iter().map(|(_, id)| id.as_str()).collect();
    assert_eq!(path, vec!["midnight", "m-128", "m-128-vz", "m-128-vz-new"]);
    assert_eq!(session.effective_price(), Decimal::new(109000, 0));
    assert_eq!(session.stock_signal(), StockSignal::Low(2));

    assert!(session.select_option(Dimension::Condition, "m-128-vz-ref"));
    assert_eq!(session.effective_price(), Decimal::new(91000, 0));

    // Inactive storage is knowable but not selectable.
    assert!(!session.select_option(Dimension::Storage, "m-256"));
    assert_eq!(session.selection().get(Dimension::Condition), Some("m-128-vz-ref"));

    assert!(session.select_option(Dimension::Color, "pink"));
    assert_eq!(session.selection().len(), 2);
    assert_eq!(session.effective_stock(), 0);
    assert_eq!(session.stock_signal(), StockSignal::SoldOut);

    assert!(session.decay().is_active("pink/pink-128"));
    assert!(session.reset_decay() > 0);
    assert!(!session.decay().is_active("pink/pink-128"));
}

#[tokio::test]
async fn test_price_display_survives_rate_outage() {
    let session = ConfiguratorSession::new(phone(), DecayConfig::default());
    let service = CurrencyService::new(OfflineProvider, ExchangeRateTable::default());
    service.fetch_live_rate().await;

    assert_eq!(service.format(Decimal::new(100, 0), &Currency::usd()).unwrap(), "$0.76");
    assert_eq!(session.formatted_price(&service, &Currency::htg()).unwrap(), "G 109000.00");
    assert_eq!(session.formatted_price(&service, &Currency::usd()).unwrap(), "$833.21");
}

#[tokio::test]
async fn test_live_rate_shared_across_readers() {
    let service = Arc::new(CurrencyService::new(FixedProvider(Decimal::new(125, 0)), ExchangeRateTable::default()));
    let before = service.table();
    service.fetch_live_rate().await;

    assert!(!before.is_live());
    assert!(service.table().is_live());
    let readers: Vec<_> = (0..4).map(|_| {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.format(Decimal::new(250, 0), &Currency::usd()).unwrap() })
    }).collect();
    for reader in readers {
        assert_eq!(reader.await.unwrap(), "$2.00");
    }
}

#[tokio::test]
async fn test_seller_edit_then_sku() {
    let hierarchy = phone();
    let mut editor = PriceEditor::new(RecordingStore::default(), SellerVariant::flatten(&hierarchy));
    assert!(editor.variants().iter().any(|v| v.id == "m-256" && !v.active));

    let range = editor.apply_price_edit("m-128-vz-ref", "89000").await.unwrap().unwrap();
    assert_eq!(range.min, Decimal::new(89000, 0));
    assert!(editor.apply_price_edit("m-128-vz-ref", "-5").await.is_err());

    let catalog = TemplateCatalog::builtin();
    let fields = HashMap::from([
        ("networkStatus".to_string(), "Verizon".to_string()),
        ("productGrade".to_string(), "Brand New".to_string()),
        ("storage".to_string(), "128GB".to_string()),
    ]);
    assert_eq!(catalog.get("smartphone").generate_sku("Midnight", &fields), "IPH15-MIDN-128GB-VZ-NEW");
    assert_eq!(catalog.get("does-not-exist").generate_sku("Midnight", &fields), "SKU-PENDING");
}

#[tokio::test]
async fn test_repeated_ids_and_short_hierarchy() {
    let record: ProductRecord = serde_json::from_value(serde_json::json!({
        "id": "ipad", "name": "iPad", "price": 50000,
        "variants": [
            { "id": "black", "name": "Midnight", "storageOptions": [{ "id": "128", "name": "128GB", "stock": 9 }] },
            { "id": "white", "name": "Starlight", "storageOptions": [{ "id": "128", "name": "128GB", "stock": 0 }] }
        ]
    })).unwrap();
    let mut session = ConfiguratorSession::new(Arc::new(VariantHierarchy::from_record(record)), DecayConfig::default());
    assert_eq!(session.stock_signal(), StockSignal::InStock(9));
    assert!(session.select_option(Dimension::Color, "white"));
    assert_eq!(session.stock_signal(), StockSignal::SoldOut);

    let fields = HashMap::from([("storage".to_string(), "128GB".to_string())]);
    let sku = TemplateCatalog::builtin().get("smartphone").generate_sku("Midnight", &fields);
    assert_eq!(sku, "IPH15-MIDN-128GB");
}
