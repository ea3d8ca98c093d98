//! Engines that own per-view or process-wide state
pub mod currency;
pub mod seller;
pub mod session;
pub mod sku;
pub mod stock_decay;

pub use currency::{CurrencyService, ExchangeRateTable, HttpRateProvider, LivePair, RateFetchError, RateProvider};
pub use seller::{PriceEdit, PriceEditor, SellerVariant, StoreError, VariantDraft, VariantPriceStore};
pub use session::{ConfiguratorSession, StockSignal};
pub use sku::{SkuGenerator, TemplateCatalog, VariantTemplate};
pub use stock_decay::{DecayConfig, DecayRecord, StockDecaySimulator};
