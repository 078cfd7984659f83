//! Report engine routes.
//!
//! List, selection, preview, creation, generation, detail, and artifact
//! download. Handlers stay thin: validation and planning live in
//! `tresor-core` / `tresor-db`; this module only adapts HTTP.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use tresor_core::etat::{AuditAction, ReportKind, ReportSpec, ReportStatus, ReportTotals};
use tresor_core::planner::{Cell, ReportRow};
use tresor_core::registry;
use tresor_core::render::{ReportDocument, nom_artefact, render_pdf, render_xlsx};
use tresor_core::storage::ArtifactKind;
use tresor_db::entities::etats;
use tresor_db::repositories::etat::EtatStoreError;
use tresor_db::{AuditRepository, ConfigurationRepository, EtatRepository, SourceRepository};
use tresor_shared::AppError;
use tresor_shared::types::{PageRequest, PageResponse};

use crate::AppState;
use crate::extractors::Principal;

/// Creates the report engine routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_etats))
        .route("/selection/", get(get_selection).post(post_selection))
        .route("/preview/", post(preview))
        .route("/create/", post(create_etat))
        .route("/generer/{id}/", get(generer))
        .route("/detail/{id}/", get(detail))
        .route("/telecharger/{id}/{artefact}/", get(telecharger))
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters for the descriptor list.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Filter by kind.
    pub kind: Option<String>,
    /// Filter by status.
    pub statut: Option<String>,
    /// Pagination.
    #[serde(flatten)]
    pub page: PageRequest,
}

// ============================================================================
// Response Types
// ============================================================================

/// One descriptor in the list response.
#[derive(Debug, Serialize)]
pub struct EtatSummary {
    /// Descriptor ID.
    pub id: Uuid,
    /// Report kind.
    pub kind: String,
    /// Report title.
    pub titre: String,
    /// Window start.
    pub date_debut: String,
    /// Window end.
    pub date_fin: String,
    /// Lifecycle status.
    pub statut: String,
    /// USD total.
    pub total_usd: String,
    /// CDF total.
    pub total_cdf: String,
    /// General total.
    pub total_general: String,
    /// Creator principal.
    pub cree_par: String,
    /// Creation timestamp (UTC).
    pub created_at: String,
}

impl From<&etats::Model> for EtatSummary {
    fn from(model: &etats::Model) -> Self {
        Self {
            id: model.id,
            kind: model.kind.clone(),
            titre: model.titre.clone(),
            date_debut: model.date_debut.to_string(),
            date_fin: model.date_fin.to_string(),
            statut: model.statut.clone(),
            total_usd: model.total_usd.to_string(),
            total_cdf: model.total_cdf.to_string(),
            total_general: model.total_general.to_string(),
            cree_par: model.cree_par.clone(),
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// Per-kind defaults powering the selection form.
#[derive(Debug, Serialize)]
pub struct SelectionEntry {
    /// Report kind.
    pub kind: String,
    /// French plural label.
    pub label_pluriel: &'static str,
    /// Default title.
    pub titre_defaut: String,
    /// Default periodicity.
    pub periodicite_defaut: String,
    /// Displayable columns.
    pub colonnes: serde_json::Value,
    /// Available filters.
    pub filtres_disponibles: serde_json::Value,
}

// ============================================================================
// Helper Functions
// ============================================================================

fn internal_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": message
        })),
    )
        .into_response()
}

fn not_found(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "message": message
        })),
    )
        .into_response()
}

fn detail_url(id: Uuid) -> String {
    format!("/etats/detail/{id}/")
}

/// Renders rows into display strings for the preview payload.
fn lignes_of(rows: &[ReportRow], limit: usize) -> Vec<Vec<String>> {
    rows.iter()
        .take(limit)
        .map(|row| row.cells.iter().map(Cell::render).collect())
        .collect()
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /etats/
///
/// Paginated descriptor list, filterable by kind and status.
#[axum::debug_handler]
async fn list_etats(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let kind = query.kind.as_deref().and_then(ReportKind::parse);
    let statut = query.statut.as_deref().and_then(ReportStatus::parse);

    let repo = EtatRepository::new((*state.db).clone());
    match repo.list(kind, statut, &query.page).await {
        Ok((models, total)) => {
            let data: Vec<EtatSummary> = models.iter().map(EtatSummary::from).collect();
            let response =
                PageResponse::new(data, query.page.page, query.page.per_page, total);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list report descriptors");
            internal_error("Failed to list reports")
        }
    }
}

/// GET /etats/selection/
///
/// Per-kind defaults from `configuration_etats`, merged with the registry's
/// labels.
#[axum::debug_handler]
async fn get_selection(State(state): State<AppState>) -> impl IntoResponse {
    let repo = ConfigurationRepository::new((*state.db).clone());
    let configurations = match repo.all().await {
        Ok(configurations) => configurations,
        Err(e) => {
            error!(error = %e, "Failed to load report configuration");
            return internal_error("Failed to load report configuration");
        }
    };

    let entries: Vec<SelectionEntry> = configurations
        .into_iter()
        .filter_map(|config| {
            let kind = ReportKind::parse(&config.kind)?;
            let adapter = registry::adapter_for(kind)?;
            Some(SelectionEntry {
                kind: config.kind,
                label_pluriel: adapter.label_pluriel,
                titre_defaut: config.titre_defaut,
                periodicite_defaut: config.periodicite_defaut,
                colonnes: config.colonnes,
                filtres_disponibles: config.filtres_disponibles,
            })
        })
        .collect();

    (StatusCode::OK, Json(json!({ "kinds": entries }))).into_response()
}

/// POST /etats/selection/
///
/// Form-flow creation: validates, persists the descriptor, and redirects to
/// generation. Validation failures re-surface the field map.
#[axum::debug_handler]
async fn post_selection(
    State(state): State<AppState>,
    principal: Principal,
    Json(spec): Json<ReportSpec>,
) -> Response {
    match create_descriptor(&state, &spec, &principal).await {
        Ok(model) => Redirect::to(&format!("/etats/generer/{}/", model.id)).into_response(),
        Err(response) => response,
    }
}

/// POST /etats/create/
///
/// JSON creation used by the asynchronous form. Returns the new descriptor
/// ID without triggering generation.
#[axum::debug_handler]
async fn create_etat(
    State(state): State<AppState>,
    principal: Principal,
    Json(spec): Json<ReportSpec>,
) -> Response {
    match create_descriptor(&state, &spec, &principal).await {
        Ok(model) => (
            StatusCode::OK,
            Json(json!({ "success": true, "etat_id": model.id })),
        )
            .into_response(),
        Err(response) => response,
    }
}

/// Shared creation path: validate, persist, audit. No side effect on
/// validation failure.
async fn create_descriptor(
    state: &AppState,
    spec: &ReportSpec,
    principal: &Principal,
) -> Result<etats::Model, Response> {
    if let Err(violations) = spec.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "errors": violations.fields })),
        )
            .into_response());
    }

    let repo = EtatRepository::new((*state.db).clone());
    let model = repo.create(spec, principal.as_str()).await.map_err(|e| {
        error!(error = %e, "Failed to create report descriptor");
        internal_error("Failed to create report")
    })?;

    let audit = AuditRepository::new((*state.db).clone());
    audit
        .record(
            model.id,
            AuditAction::Create,
            principal.as_str(),
            json!({ "kind": model.kind, "titre": model.titre }),
        )
        .await;

    info!(etat_id = %model.id, kind = %model.kind, "Report descriptor created");
    Ok(model)
}

/// POST /etats/preview/
///
/// Computes aggregates and a bounded sample of rows without persisting
/// anything.
#[axum::debug_handler]
async fn preview(
    State(state): State<AppState>,
    _principal: Principal,
    Json(spec): Json<ReportSpec>,
) -> impl IntoResponse {
    if let Err(violations) = spec.validate() {
        let message = violations
            .fields
            .values()
            .cloned()
            .collect::<Vec<_>>()
            .join(" ; ");
        return (
            StatusCode::OK,
            Json(json!({ "success": false, "error": message })),
        )
            .into_response();
    }

    let sources = SourceRepository::new((*state.db).clone());
    match sources.plan(&spec).await {
        Ok((rows, totals)) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "count": rows.len(),
                "total_usd": totals.total_usd.to_string(),
                "total_cdf": totals.total_cdf.to_string(),
                "lignes": lignes_of(&rows, state.engine.preview_rows),
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Preview planning failed");
            (
                StatusCode::OK,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Outcome of one generation run.
struct Generated {
    totals: ReportTotals,
    fichier_pdf: Option<String>,
    fichier_excel: Option<String>,
    count: usize,
}

/// Runs planner and renderer for an existing descriptor.
///
/// Totals are persisted before rendering so a renderer fault still leaves
/// meaningful figures with the ERROR status. A partially written artifact
/// is deleted when the second rendering fails.
async fn run_generation(
    state: &AppState,
    model: &etats::Model,
    spec: &ReportSpec,
) -> Result<Generated, AppError> {
    let sources = SourceRepository::new((*state.db).clone());
    let (rows, totals) = sources.plan(spec).await?;

    let repo = EtatRepository::new((*state.db).clone());
    repo.mark_totals(model.id, totals).await?;

    let adapter = registry::adapter_for(spec.kind).ok_or_else(|| {
        AppError::BusinessRule(format!("no record adapter for {}", spec.kind))
    })?;
    let document = ReportDocument::new(
        adapter,
        &spec.titre,
        (spec.date_debut, spec.date_fin),
        &rows,
        totals,
        spec.options.include_details,
    );

    let mut fichier_pdf = None;
    if spec.options.format.wants_pdf() {
        let bytes = render_pdf(&document)?;
        let filename = nom_artefact(spec.kind, &spec.titre, &document.genere_le, "pdf");
        let key = state
            .artifacts
            .write(ArtifactKind::Pdf, &filename, bytes)
            .await?;
        fichier_pdf = Some(key);
    }

    let mut fichier_excel = None;
    if spec.options.format.wants_xlsx() {
        let result: Result<String, AppError> = async {
            let bytes = render_xlsx(&document)?;
            let filename = nom_artefact(spec.kind, &spec.titre, &document.genere_le, "xlsx");
            Ok(state
                .artifacts
                .write(ArtifactKind::Excel, &filename, bytes)
                .await?)
        }
        .await;

        match result {
            Ok(key) => fichier_excel = Some(key),
            Err(e) => {
                // Discard the partially written PDF before reporting.
                if let Some(key) = &fichier_pdf
                    && let Err(cleanup) = state.artifacts.delete(key).await
                {
                    error!(error = %cleanup, %key, "Failed to discard partial artifact");
                }
                return Err(e);
            }
        }
    }

    Ok(Generated {
        totals,
        fichier_pdf,
        fichier_excel,
        count: rows.len(),
    })
}

/// GET /etats/generer/{id}/
///
/// Runs planner and renderer, persists totals and artifacts, and redirects
/// to the detail view. Re-running replaces the artifacts.
#[axum::debug_handler]
async fn generer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    principal: Principal,
) -> Response {
    let repo = EtatRepository::new((*state.db).clone());
    let model = match repo.require(id).await {
        Ok(model) => model,
        Err(EtatStoreError::NotFound(_)) => return not_found("Report not found"),
        Err(e) => {
            error!(error = %e, "Failed to load report descriptor");
            return internal_error("Failed to load report");
        }
    };

    let spec = match EtatRepository::spec_of(&model) {
        Ok(spec) => spec,
        Err(e) => {
            error!(error = %e, "Stored descriptor is corrupt");
            if let Err(mark) = repo.mark_error(id, &e.to_string()).await {
                error!(error = %mark, "Failed to record report error state");
            }
            return Redirect::to(&detail_url(id)).into_response();
        }
    };

    let audit = AuditRepository::new((*state.db).clone());

    match run_generation(&state, &model, &spec).await {
        Ok(generated) => {
            if let Err(e) = repo
                .mark_generated(
                    id,
                    generated.fichier_pdf.clone(),
                    generated.fichier_excel.clone(),
                )
                .await
            {
                error!(error = %e, "Failed to finalize report descriptor");
                return internal_error("Failed to finalize report");
            }

            audit
                .record(
                    id,
                    AuditAction::Generate,
                    principal.as_str(),
                    json!({
                        "count": generated.count,
                        "total_usd": generated.totals.total_usd.to_string(),
                        "total_cdf": generated.totals.total_cdf.to_string(),
                    }),
                )
                .await;

            info!(etat_id = %id, count = generated.count, "Report generated");
            Redirect::to(&detail_url(id)).into_response()
        }
        Err(e) => {
            error!(etat_id = %id, error = %e, "Report generation failed");
            if let Err(mark) = repo.mark_error(id, &e.to_string()).await {
                error!(error = %mark, "Failed to record report error state");
            }
            Redirect::to(&detail_url(id)).into_response()
        }
    }
}

/// GET /etats/detail/{id}/
///
/// Descriptor view with its audit history.
#[axum::debug_handler]
async fn detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    principal: Principal,
) -> Response {
    let repo = EtatRepository::new((*state.db).clone());
    let model = match repo.get(id).await {
        Ok(Some(model)) => model,
        Ok(None) => return not_found("Report not found"),
        Err(e) => {
            error!(error = %e, "Failed to load report descriptor");
            return internal_error("Failed to load report");
        }
    };

    let audit = AuditRepository::new((*state.db).clone());
    let history = match audit.history(id).await {
        Ok(history) => history,
        Err(e) => {
            error!(error = %e, "Failed to load report history");
            return internal_error("Failed to load report history");
        }
    };

    audit
        .record(id, AuditAction::View, principal.as_str(), json!({}))
        .await;

    let history: Vec<serde_json::Value> = history
        .iter()
        .map(|entry| {
            json!({
                "action": entry.action,
                "principal": entry.principal,
                "details": entry.details,
                "created_at": entry.created_at.to_rfc3339(),
            })
        })
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "etat": {
                "id": model.id,
                "kind": model.kind,
                "titre": model.titre,
                "description": model.description,
                "date_debut": model.date_debut.to_string(),
                "date_fin": model.date_fin.to_string(),
                "periodicite": model.periodicite,
                "filtres": model.filtres,
                "criteres": model.criteres,
                "options": model.options,
                "statut": model.statut,
                "erreur": model.erreur,
                "total_usd": model.total_usd.to_string(),
                "total_cdf": model.total_cdf.to_string(),
                "total_general": model.total_general.to_string(),
                "fichier_pdf": model.fichier_pdf,
                "fichier_excel": model.fichier_excel,
                "cree_par": model.cree_par,
                "created_at": model.created_at.to_rfc3339(),
            },
            "historique": history,
        })),
    )
        .into_response()
}

/// GET /etats/telecharger/{id}/{pdf|excel}/
///
/// Streams an artifact; a missing artifact redirects to the detail view.
#[axum::debug_handler]
async fn telecharger(
    State(state): State<AppState>,
    Path((id, artefact)): Path<(Uuid, String)>,
    principal: Principal,
) -> Response {
    let Some(kind) = ArtifactKind::parse(&artefact) else {
        return not_found("Unknown artifact kind");
    };

    let repo = EtatRepository::new((*state.db).clone());
    let model = match repo.get(id).await {
        Ok(Some(model)) => model,
        Ok(None) => return not_found("Report not found"),
        Err(e) => {
            error!(error = %e, "Failed to load report descriptor");
            return internal_error("Failed to load report");
        }
    };

    let key = match kind {
        ArtifactKind::Pdf => model.fichier_pdf.clone(),
        ArtifactKind::Excel => model.fichier_excel.clone(),
    };
    let Some(key) = key else {
        return Redirect::to(&detail_url(id)).into_response();
    };

    let bytes = match state.artifacts.read(&key).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, %key, "Artifact blob is unreadable");
            return Redirect::to(&detail_url(id)).into_response();
        }
    };

    let audit = AuditRepository::new((*state.db).clone());
    audit
        .record(
            id,
            AuditAction::Download,
            principal.as_str(),
            json!({ "artefact": artefact }),
        )
        .await;

    let filename = key.rsplit('/').next().unwrap_or("etat").to_string();
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, kind.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_lignes_of_caps_rows_and_renders_cells() {
        let rows: Vec<ReportRow> = (0..5)
            .map(|i| {
                ReportRow::new(
                    vec![Cell::Text(format!("REC-{i}")), Cell::Montant(Decimal::from(1000))],
                    (Decimal::from(1000), Decimal::ZERO),
                )
            })
            .collect();

        let lignes = lignes_of(&rows, 3);
        assert_eq!(lignes.len(), 3);
        assert_eq!(lignes[0], vec!["REC-0".to_string(), "1 000,00".to_string()]);
    }

    #[test]
    fn test_detail_url_shape() {
        let id = Uuid::nil();
        assert_eq!(
            detail_url(id),
            "/etats/detail/00000000-0000-0000-0000-000000000000/"
        );
    }
}
