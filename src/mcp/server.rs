//! Nutriflow MCP Server Implementation
//!
//! Exposes the catalog, intake and log tools over MCP.

use std::sync::{Arc, MutexGuard};

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::session::Session;
use crate::tools::ingredients::{
    self, GetIngredientRequest, SearchIngredientsRequest, UpdateServingSizesRequest,
};
use crate::tools::intake::{
    self, DeselectIngredientRequest, SelectIngredientRequest, SetSelectionAmountRequest,
};
use crate::tools::logs::{
    self, ExportLogRequest, GenerateReportRequest, ImportLogRequest, NewLogRequest,
};
use crate::tools::status::StatusTracker;

/// Nutriflow MCP Service
#[derive(Clone)]
pub struct NutriflowService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    /// One writer at a time; every tool call runs its file writes under this lock
    session: Arc<std::sync::Mutex<Session>>,
    tool_router: ToolRouter<NutriflowService>,
}

impl NutriflowService {
    pub fn new(session: Session) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new())),
            session: Arc::new(std::sync::Mutex::new(session)),
            tool_router: Self::tool_router(),
        }
    }

    fn session(&self) -> Result<MutexGuard<'_, Session>, McpError> {
        self.session
            .lock()
            .map_err(|_| McpError::internal_error("Session lock poisoned", None))
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl NutriflowService {
    // --- Status ---

    #[tool(description = "Get the current status of the Nutriflow service including build info, data file locations, and process information")]
    async fn nutriflow_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = {
            let session = self.session()?;
            tracker.get_status(&session)
        };
        json_result(&status)
    }

    #[tool(description = "Get step-by-step instructions for logging intake. Call this when starting a logging session or when unsure how to use the tools.")]
    fn intake_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::INTAKE_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(INTAKE_INSTRUCTIONS)]))
    }

    // --- Catalog ---

    #[tool(description = "Search the ingredient catalog by name, sorted alphabetically, by frequency of use, or by protein/carbohydrate per serving")]
    fn search_ingredients(&self, Parameters(p): Parameters<SearchIngredientsRequest>) -> Result<CallToolResult, McpError> {
        let session = self.session()?;
        let result = ingredients::search_ingredients(&session, p).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get nutrition facts and serving sizes for one ingredient")]
    fn get_ingredient(&self, Parameters(p): Parameters<GetIngredientRequest>) -> Result<CallToolResult, McpError> {
        let session = self.session()?;
        let name = p.name.clone();
        let result = ingredients::get_ingredient(&session, p).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(detail) => json_result(&detail),
            None => json_result(&serde_json::json!({ "error": "Ingredient not found", "name": name })),
        }
    }

    #[tool(description = "Set custom serving sizes (grams) for catalog ingredients. Saved to the catalog immediately; unknown names are ignored.")]
    fn update_serving_sizes(&self, Parameters(p): Parameters<UpdateServingSizesRequest>) -> Result<CallToolResult, McpError> {
        let mut session = self.session()?;
        let result = ingredients::update_serving_sizes(&mut session, p).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Selection ---

    #[tool(description = "Add an ingredient to the pending selection. Amount defaults to its custom serving size.")]
    fn select_ingredient(&self, Parameters(p): Parameters<SelectIngredientRequest>) -> Result<CallToolResult, McpError> {
        let mut session = self.session()?;
        let result = intake::select_ingredient(&mut session, p).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Remove an ingredient from the pending selection")]
    fn deselect_ingredient(&self, Parameters(p): Parameters<DeselectIngredientRequest>) -> Result<CallToolResult, McpError> {
        let mut session = self.session()?;
        json_result(&intake::deselect_ingredient(&mut session, p))
    }

    #[tool(description = "Change the amount (grams) of a selected ingredient")]
    fn set_selection_amount(&self, Parameters(p): Parameters<SetSelectionAmountRequest>) -> Result<CallToolResult, McpError> {
        let mut session = self.session()?;
        let result = intake::set_selection_amount(&mut session, p).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Show the pending selection and its nutrition totals")]
    fn get_selection(&self) -> Result<CallToolResult, McpError> {
        let session = self.session()?;
        json_result(&intake::get_selection(&session))
    }

    #[tool(description = "Discard the pending selection")]
    fn clear_selection(&self) -> Result<CallToolResult, McpError> {
        let mut session = self.session()?;
        json_result(&intake::clear_selection(&mut session))
    }

    #[tool(description = "Commit the pending selection: saves custom serving sizes, adds the totals to the day's profile, then clears the selection")]
    fn update_intake(&self) -> Result<CallToolResult, McpError> {
        let mut session = self.session()?;
        let result = intake::update_intake(&mut session).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get goal, consumed amount and percent of goal for each nutrient")]
    fn get_progress(&self) -> Result<CallToolResult, McpError> {
        let session = self.session()?;
        json_result(&intake::get_progress(&session))
    }

    // --- Logs ---

    #[tool(description = "Get the active profile: date, weight, goals, consumed totals and consumed ingredients")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let session = self.session()?;
        json_result(&logs::get_profile(&session))
    }

    #[tool(description = "Start a new empty daily log dated today, with optional weight and goals. Writes the CSV log and replaces the active profile.")]
    fn new_log(&self, Parameters(p): Parameters<NewLogRequest>) -> Result<CallToolResult, McpError> {
        let mut session = self.session()?;
        let result = logs::new_log(&mut session, p).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Load a CSV daily log as the active profile. The current profile is left untouched if the file cannot be read.")]
    fn import_log(&self, Parameters(p): Parameters<ImportLogRequest>) -> Result<CallToolResult, McpError> {
        let mut session = self.session()?;
        let result = logs::import_log(&mut session, p).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Write the active profile to a CSV daily log")]
    fn export_log(&self, Parameters(p): Parameters<ExportLogRequest>) -> Result<CallToolResult, McpError> {
        let session = self.session()?;
        let result = logs::export_log(&session, p).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Merge every CSV log in the log directory into report_log_<date>.csv, one summary row per log")]
    fn generate_report(&self, Parameters(p): Parameters<GenerateReportRequest>) -> Result<CallToolResult, McpError> {
        let session = self.session()?;
        let result = logs::generate_report(&session, p).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for NutriflowService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutriflow".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Nutriflow".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Nutriflow - daily protein, carbohydrate, fat and calorie tracking. \
                 IMPORTANT: Call intake_instructions before logging. \
                 Catalog: search_ingredients/get_ingredient/update_serving_sizes. \
                 Selection: select_ingredient/deselect_ingredient/set_selection_amount/get_selection/clear_selection. \
                 Commit with update_intake; check get_progress. \
                 Logs: get_profile, new_log, import_log, export_log, generate_report."
                    .into(),
            ),
        }
    }
}
