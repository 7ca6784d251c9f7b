pub mod config;
pub mod error;
pub mod handlers;
pub mod helpers;
pub mod logging;
pub mod routes;
pub mod state;

use crate::config::{ApiConfig, RateSourceKind};
use genboq_core::{GenerationSettings, FixedRateSource, HttpRateSource, RateSource};

pub fn generation_settings(config: &ApiConfig) -> GenerationSettings {
    GenerationSettings {
        model: config.llm.model.clone().unwrap_or_default(),
        generation_temperature: config.llm.generation_temperature,
        refinement_temperature: config.llm.refinement_temperature,
        ..GenerationSettings::default()
    }
}

/// Falls back to the fixed table when the HTTP source is selected without a URL
pub fn rate_source(config: &ApiConfig) -> anyhow::Result<Box<dyn RateSource>> {
    match (config.rates.source, config.rates.url.as_deref()) {
        (RateSourceKind::Http, Some(url)) => Ok(Box::new(HttpRateSource::new(url)?)),
        (RateSourceKind::Http, None) => {
            tracing::warn!("rates.source is \"http\" but rates.url is not set, using fixed rates");
            Ok(Box::new(FixedRateSource))
        }
        (RateSourceKind::Fixed, _) => Ok(Box::new(FixedRateSource)),
    }
}
