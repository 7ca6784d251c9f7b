use serde_json::{json, Value};
use shared_types::{ClientDetails, Room};

pub const SYSTEM_INSTRUCTION: &str = r#"You are an expert, AVIXA CTS-D certified AV Design Engineer. Your task is to generate a detailed, logically sound, and complete Bill of Quantities (BOQ) based on user-provided requirements. You must adhere to AVIXA standards.

**CRITICAL RULES:**
1.  **Product Selection:** You MUST select specific, real-world, commercially available products from reputable AV brands (Crestron, QSC, Shure, Biamp, Panasonic, Christie, Barco, Poly, Bose, etc.). Provide exact **brand** and **modelNumber**.
2.  **Logical System Design:** The system MUST be complete and functional.
    *   **Audio:** For large rooms like auditoriums, specify a front-of-house (FOH) point-source or line array system for primary audio, not just ceiling speakers. Include subwoofers if music/video playback is required.
    *   **Control:** If the system is complex (video conferencing, multiple sources), you MUST specify a touch panel (e.g., Crestron TSW-1070). A simple keypad is inadequate. If the user asks for a keypad, override it and explain why in the 'notes'.
    *   **Completeness:** Include ALL necessary auxiliary items: correctly sized racks (e.g., 42U for complex systems), power management (PDU, sequencer), mounts, rack shelves, bulk cabling, and connectors.
3.  **Pricing:** Provide realistic, estimated retail prices in USD for budgeting.
4.  **Image URL:** Find a stable, public URL for an image of the product, prioritizing manufacturer or major retailer websites.
5.  **Justify Choices:** Use the 'notes' field to explain key design decisions, especially when correcting a user's request (e.g., "Note: A touch panel is required for this level of control as per AVIXA best practices.").
6.  **Budget Constraint:** If a budget is provided, make product selections to meet it. Justify cost-saving choices in the 'notes' field (e.g., "Note: Selected a more budget-friendly projector to align with the provided budget.").
7.  **JSON Output:** Format the entire output as a single JSON object that strictly adheres to the provided schema. Do not include any text, explanations, or markdown formatting outside of the JSON structure.
"#;

/// JSON Schema for `{ rooms: [{ name, requirements, boq: [item] }] }`
pub fn response_schema() -> Value {
    let item = json!({
        "type": "object",
        "properties": {
            "category": { "type": "string", "description": "e.g. Display, Audio, Video Conferencing, Control System" },
            "itemName": { "type": "string" },
            "brand": { "type": "string" },
            "modelNumber": { "type": "string" },
            "description": { "type": "string" },
            "quantity": { "type": "integer", "minimum": 0 },
            "unitPrice": { "type": "number", "minimum": 0, "description": "Estimated unit price in USD, no currency symbols" },
            "imageUrl": { "type": "string" },
            "notes": { "type": "string" }
        },
        "required": [
            "category", "itemName", "brand", "modelNumber", "description",
            "quantity", "unitPrice", "notes", "imageUrl"
        ]
    });

    let room = json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "requirements": { "type": "string" },
            "boq": { "type": "array", "items": item }
        },
        "required": ["name", "requirements", "boq"]
    });

    json!({
        "type": "object",
        "properties": {
            "rooms": { "type": "array", "items": room }
        },
        "required": ["rooms"]
    })
}

pub fn generation_prompt(requirements: &str, client_details: &ClientDetails) -> String {
    let mut prompt = format!("Client Requirements:\n{}", requirements.trim());
    if let Some(budget) = client_details.budget {
        prompt.push_str(&format!(
            "\n\nThe client has an approximate budget of ${} for this room/project. Please select equipment that aligns with this budget.",
            budget
        ));
    }
    prompt
}

pub fn refinement_prompt(rooms: &[Room], instruction: &str) -> Result<String, serde_json::Error> {
    let existing = serde_json::to_string_pretty(&json!({ "rooms": rooms }))?;

    Ok(format!(
        r#"Given the existing Bill of Quantities (BOQ) below, please apply the following refinement: "{}".

Existing BOQ:
{}

Please return the full, updated BOQ in the exact same JSON format as the input. Only modify the items as requested in the refinement prompt. For example, if asked to change a brand, find the relevant items and update their 'brand', 'modelNumber', 'itemName', and 'unitPrice' fields accordingly. If asked to add an item, append it to the correct room's 'boq' array."#,
        instruction.trim(),
        existing
    ))
}
