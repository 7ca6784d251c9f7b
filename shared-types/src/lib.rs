pub mod api;
pub mod boq;
pub mod currency;
pub mod questionnaire;

pub use api::{
    AddItemRequest, AddRoomRequest, CompileQuestionnaireRequest, CompileQuestionnaireResponse,
    CurrencyInfo, ErrorResponse, GenerateBoqRequest, RatesResponse, RefineBoqRequest,
    RenameRoomRequest, ReplaceItemsRequest, ReplaceRoomsRequest, RoomView, RoomsResponse,
    SessionGenerateRequest, SessionRefineRequest, SessionView, SetCurrencyRequest,
};
pub use boq::{
    grand_total, BoqItem, ClientDetails, ItemFieldUpdate, NumericInput, Room,
    DEFAULT_PREPARED_BY,
};
pub use currency::{Currency, RateTable};
pub use questionnaire::{
    Answer, Answers, Question, QuestionKind, QuestionOption, QuestionnaireDefinition,
    QuestionnaireSection,
};
