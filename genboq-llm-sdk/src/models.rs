//! Model constants for supported LLM providers
//!
//! Model IDs are sourced from official provider documentation.

/// Gemini model constants
pub mod gemini {
    /// Gemini 2.5 Pro - Strong structured output, used for BOQ generation
    /// Context: 1M/64k
    pub const GEMINI_2_5_PRO_ID: &str = "gemini-2.5-pro";
    pub const GEMINI_2_5_PRO_NAME: &str = "Gemini 2.5 Pro";

    /// Gemini 2.5 Flash - Faster and cheaper, adequate for refinements
    pub const GEMINI_2_5_FLASH_ID: &str = "gemini-2.5-flash";
    pub const GEMINI_2_5_FLASH_NAME: &str = "Gemini 2.5 Flash";

    /// Gemini 3 Pro - Most intelligent model for complex reasoning
    /// Released: Preview, Context: 1M/64k, Thinking: low/high
    pub const GEMINI_3_PRO_ID: &str = "gemini-3-pro-preview";
    pub const GEMINI_3_PRO_NAME: &str = "Gemini 3 Pro";

    // Backwards compatibility
    pub const GEMINI_2_5_PRO: &str = GEMINI_2_5_PRO_ID;
    pub const GEMINI_2_5_FLASH: &str = GEMINI_2_5_FLASH_ID;
    pub const GEMINI_3_PRO: &str = GEMINI_3_PRO_ID;
}

/// Human-readable name for a known model id
pub fn display_name(model_id: &str) -> Option<&'static str> {
    match model_id {
        gemini::GEMINI_2_5_PRO_ID => Some(gemini::GEMINI_2_5_PRO_NAME),
        gemini::GEMINI_2_5_FLASH_ID => Some(gemini::GEMINI_2_5_FLASH_NAME),
        gemini::GEMINI_3_PRO_ID => Some(gemini::GEMINI_3_PRO_NAME),
        _ => None,
    }
}
