use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use shared_types::{Currency, CurrencyInfo, RatesResponse};

pub async fn get_rates(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let rates = state.rates()?;

    let currencies = Currency::ALL
        .into_iter()
        .map(|currency| CurrencyInfo {
            code: currency,
            label: currency.label(),
            symbol: currency.symbol().to_string(),
            rate: rates.rate(currency),
            available: currency == Currency::REFERENCE || rates.is_available(currency),
        })
        .collect();

    Ok(HttpResponse::Ok().json(RatesResponse {
        base: Currency::REFERENCE,
        loaded: rates.is_loaded(),
        rates: rates.table().clone(),
        currencies,
    }))
}
