use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Data model
    let mut types = vec![
        clean_type(ClientDetails::export_to_string()?),
        clean_type(BoqItem::export_to_string()?),
        clean_type(Room::export_to_string()?),
        clean_type(NumericInput::export_to_string()?),
        clean_type(ItemFieldUpdate::export_to_string()?),
        clean_type(Currency::export_to_string()?),
    ];

    // Questionnaire
    types.push(clean_type(QuestionOption::export_to_string()?));
    types.push(clean_type(QuestionKind::export_to_string()?));
    types.push(clean_type(Question::export_to_string()?));
    types.push(clean_type(QuestionnaireSection::export_to_string()?));
    types.push(clean_type(QuestionnaireDefinition::export_to_string()?));
    types.push(clean_type(Answer::export_to_string()?));

    // API requests and responses
    types.push(clean_type(GenerateBoqRequest::export_to_string()?));
    types.push(clean_type(RefineBoqRequest::export_to_string()?));
    types.push(clean_type(RoomsResponse::export_to_string()?));
    types.push(clean_type(ErrorResponse::export_to_string()?));
    types.push(clean_type(CompileQuestionnaireRequest::export_to_string()?));
    types.push(clean_type(CompileQuestionnaireResponse::export_to_string()?));
    types.push(clean_type(CurrencyInfo::export_to_string()?));
    types.push(clean_type(RatesResponse::export_to_string()?));
    types.push(clean_type(SessionGenerateRequest::export_to_string()?));
    types.push(clean_type(SessionRefineRequest::export_to_string()?));
    types.push(clean_type(SetCurrencyRequest::export_to_string()?));
    types.push(clean_type(AddRoomRequest::export_to_string()?));
    types.push(clean_type(RenameRoomRequest::export_to_string()?));
    types.push(clean_type(AddItemRequest::export_to_string()?));
    types.push(clean_type(ReplaceItemsRequest::export_to_string()?));
    types.push(clean_type(ReplaceRoomsRequest::export_to_string()?));
    types.push(clean_type(RoomView::export_to_string()?));
    types.push(clean_type(SessionView::export_to_string()?));

    let output_dir = Path::new("web/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');
    let filtered: Vec<&str> = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
        })
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
