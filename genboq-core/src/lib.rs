//! Domain logic for GenBOQ: prompt shaping, strict parsing of model output, the
//! session editing model, currency conversion and workbook export.

pub mod currency;
pub mod error;
pub mod export;
pub mod generation;
pub mod prompts;
pub mod questionnaire;
pub mod rates;
pub mod store;

pub use currency::{format_currency, ExchangeRates};
pub use error::BoqError;
pub use export::{export_workbook, ExportRequest, ExportedWorkbook};
pub use generation::{BoqGenerator, GenerationSettings};
pub use questionnaire::{compile_requirements, default_questionnaire};
pub use rates::{load_rates, FixedRateSource, HttpRateSource, RateSource};
pub use store::{validate_client_details, Completion, RequestTicket, Session};
