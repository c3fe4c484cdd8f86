use crate::auth::{Permission, PermissionCheck, PermissionSet};
use crate::config::AppConfig;
use crate::db::records::{self, Collection};
use crate::db::work_plans::{self, TaskRef};
use crate::db::{load_snapshot, Database};
use crate::domain::badges::{overall_badge, stage_badge};
use crate::domain::board::{building_status, flat_status, task_stage};
use crate::domain::logic::{is_billing_eligible, is_final_check_eligible, stage_of};
use crate::domain::models::{BilledItem, ContractorBill, FinalCheckStatus};
use crate::domain::snapshot::Snapshot;
use crate::errors::{ResultResp, ServerError};
use crate::responses::{html_response, json_response, not_modified, redirect, xlsx_response};
use crate::spreadsheets::building_status_xlsx;
use crate::templates;
use crate::templates::components::href;
use crate::templates::pages::{BuildingRow, FlatVm};
use astra::{Body, Request, ResponseBuilder};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use std::io::Read;
use tracing::{info, warn};

const MAX_BODY_BYTES: u64 = 1024 * 1024;
const MAIN_CSS: &str = include_str!("../static/main.css");

/// Everything a request handler needs.
#[derive(Clone, Debug)]
pub struct App {
    pub db: Database,
    pub trust_all: bool,
}

impl App {
    pub fn new(db: Database, config: &AppConfig) -> Self {
        Self {
            db,
            trust_all: config.trust_all,
        }
    }
}

pub fn handle(mut req: Request, app: &App) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let query = parse_query(&req);
    let perms = PermissionSet::from_request(&req, app.trust_all);

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => home(app),
        ("GET", "/board") => board(&req, app, &query),
        ("GET", "/flat") => flat(app, &query, &perms),
        ("GET", "/kits") => kits(app, &query),
        ("GET", "/export") => export(app, &query),
        ("GET", "/api/board") => board_json(app, &query),
        ("GET", "/static/main.css") => stylesheet(),

        ("POST", "/progress") => {
            let form = parse_form(&read_body(&mut req)?);
            update_progress(app, &form, &perms)
        }
        ("POST", "/final-check") => {
            let form = parse_form(&read_body(&mut req)?);
            approve_final_check(app, &form, &perms)
        }
        ("POST", "/bill") => {
            let form = parse_form(&read_body(&mut req)?);
            bill(app, &form, &perms)
        }
        ("POST", p) if p.starts_with("/api/records/") => {
            let name = &p["/api/records/".len()..];
            let collection = Collection::from_name(name).ok_or(ServerError::NotFound)?;
            let body = read_body(&mut req)?;
            import(app, collection, &body, &perms)
        }

        _ => Err(ServerError::NotFound),
    }
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| parse_form(q.as_bytes()))
        .unwrap_or_default()
}

fn parse_form(body: &[u8]) -> HashMap<String, String> {
    url::form_urlencoded::parse(body).into_owned().collect()
}

fn read_body(req: &mut Request) -> Result<Vec<u8>, ServerError> {
    let mut buf = Vec::new();
    req.body_mut()
        .reader()
        .take(MAX_BODY_BYTES)
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("Failed to read body: {e}")))?;
    Ok(buf)
}

fn required<'a>(params: &'a HashMap<String, String>, key: &str) -> Result<&'a str, ServerError> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServerError::BadRequest(format!("missing parameter '{key}'")))
}

fn require(perms: &dyn PermissionCheck, permission: Permission) -> Result<(), ServerError> {
    if perms.has_permission(permission) {
        Ok(())
    } else {
        Err(ServerError::Forbidden(permission.to_string()))
    }
}

fn snapshot(app: &App) -> Result<Snapshot, ServerError> {
    app.db.with_conn(load_snapshot)
}

fn etag(snapshot: &Snapshot) -> String {
    URL_SAFE_NO_PAD.encode(snapshot.digest())
}

fn stylesheet() -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", mime::TEXT_CSS_UTF_8.as_ref())
        .body(Body::from(MAIN_CSS))
        .map_err(|_| ServerError::InternalError)
}

fn home(app: &App) -> ResultResp {
    let snapshot = snapshot(app)?;
    let index = snapshot.plan_index();

    let rows: Vec<BuildingRow> = snapshot
        .buildings()
        .into_iter()
        .map(|(project, building)| {
            let summary = building_status(&snapshot, &index, &project, &building).summary;
            BuildingRow {
                project_name: project,
                building_name: building,
                summary,
            }
        })
        .collect();

    html_response(templates::pages::home_page(&rows), None)
}

fn board(req: &Request, app: &App, query: &HashMap<String, String>) -> ResultResp {
    let project = required(query, "project")?;
    let building = required(query, "building")?;

    let snapshot = snapshot(app)?;
    let tag = etag(&snapshot);

    let unchanged = req
        .headers()
        .get("If-None-Match")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_matches('"') == tag);
    if unchanged {
        return not_modified(&tag);
    }

    let index = snapshot.plan_index();
    let status = building_status(&snapshot, &index, project, building);
    html_response(templates::pages::board_page(&status), Some(&tag))
}

fn flat(app: &App, query: &HashMap<String, String>, perms: &PermissionSet) -> ResultResp {
    let project = required(query, "project")?;
    let building = required(query, "building")?;
    let flat_no = required(query, "flat")?;

    let snapshot = snapshot(app)?;
    let index = snapshot.plan_index();
    let status =
        flat_status(&snapshot, &index, project, building, flat_no).ok_or(ServerError::NotFound)?;

    let vm = FlatVm {
        project_name: project,
        building_name: building,
        flat: &status,
    };
    html_response(templates::pages::flat_page(&vm, perms), None)
}

fn kits(app: &App, query: &HashMap<String, String>) -> ResultResp {
    let project = required(query, "project")?;
    // Always recomputed from the stock as it is now.
    let snapshot = snapshot(app)?;
    let report = snapshot.kit_report(project);
    html_response(templates::pages::kits_page(project, &report), None)
}

fn export(app: &App, query: &HashMap<String, String>) -> ResultResp {
    let project = required(query, "project")?;
    let building = required(query, "building")?;

    let snapshot = snapshot(app)?;
    let index = snapshot.plan_index();
    let status = building_status(&snapshot, &index, project, building);
    let buffer = building_status_xlsx(&status)?;

    xlsx_response(buffer, &format!("status_{project}_{building}.xlsx"))
}

fn board_json(app: &App, query: &HashMap<String, String>) -> ResultResp {
    let project = required(query, "project")?;
    let building = required(query, "building")?;

    let snapshot = snapshot(app)?;
    let index = snapshot.plan_index();
    let status = building_status(&snapshot, &index, project, building);

    let flats: Vec<_> = status
        .flats
        .iter()
        .map(|f| {
            json!({
                "flatNo": f.flat_no,
                "progress": f.summary.progress,
                "stage": overall_badge(f.summary.stage).label,
                "tasks": f.tasks.iter().map(|t| json!({
                    "tileId": t.tile.id,
                    "taskId": t.task.id,
                    "stage": t.stage,
                    "label": stage_badge(t.stage).label,
                    "progress": t.progress,
                    "planId": t.plan_id(),
                    "billedDate": t.billed_date,
                })).collect::<Vec<_>>(),
            })
        })
        .collect();

    json_response(&json!({
        "project": status.project_name,
        "building": status.building_name,
        "progress": status.summary.progress,
        "stage": status.summary.stage,
        "flats": flats,
    }))
}

/// The form fields every task action posts.
struct TaskForm<'a> {
    project: &'a str,
    building: &'a str,
    flat_no: &'a str,
    tile_id: &'a str,
    task_id: &'a str,
}

impl<'a> TaskForm<'a> {
    fn parse(form: &'a HashMap<String, String>) -> Result<Self, ServerError> {
        Ok(Self {
            project: required(form, "project")?,
            building: required(form, "building")?,
            flat_no: required(form, "flat")?,
            tile_id: required(form, "tile")?,
            task_id: required(form, "task")?,
        })
    }

    fn back(&self) -> String {
        href(
            "/flat",
            &[
                ("project", self.project),
                ("building", self.building),
                ("flat", self.flat_no),
            ],
        )
    }
}

/// Finds the plan holding the authoritative record for the posted task.
fn authoritative_plan(snapshot: &Snapshot, task: &TaskForm<'_>) -> Result<String, ServerError> {
    let index = snapshot.plan_index();
    let (_, instance) = task_stage(
        &index,
        task.project,
        task.building,
        task.tile_id,
        task.flat_no,
        task.task_id,
    );
    instance.map(|i| i.plan.id.clone()).ok_or_else(|| {
        ServerError::BadRequest(format!(
            "task '{}' is not planned for flat '{}'",
            task.task_id, task.flat_no
        ))
    })
}

fn update_progress(
    app: &App,
    form: &HashMap<String, String>,
    perms: &PermissionSet,
) -> ResultResp {
    require(perms, Permission::Progress)?;
    let task = TaskForm::parse(form)?;
    let progress = required(form, "progress")?
        .parse::<u8>()
        .ok()
        .filter(|p| *p <= 100)
        .ok_or_else(|| ServerError::BadRequest("progress must be between 0 and 100".into()))?;

    let plan_id = authoritative_plan(&snapshot(app)?, &task)?;
    let target = TaskRef {
        plan_id: &plan_id,
        flat_no: task.flat_no,
        task_id: task.task_id,
    };

    app.db.with_conn(|conn| {
        work_plans::update_task(conn, &target, |record| {
            record.progress = progress;
            Ok(())
        })
    })?;

    info!(plan_id = %plan_id, flat_no = task.flat_no, task_id = task.task_id, progress, "progress updated");
    redirect(&task.back())
}

fn approve_final_check(
    app: &App,
    form: &HashMap<String, String>,
    perms: &PermissionSet,
) -> ResultResp {
    require(perms, Permission::FinalCheck)?;
    let task = TaskForm::parse(form)?;

    let plan_id = authoritative_plan(&snapshot(app)?, &task)?;
    let target = TaskRef {
        plan_id: &plan_id,
        flat_no: task.flat_no,
        task_id: task.task_id,
    };

    app.db.with_conn(|conn| {
        work_plans::update_task(conn, &target, |record| {
            let stage = stage_of(Some(&*record));
            if !is_final_check_eligible(stage) {
                warn!(plan_id = %plan_id, task_id = task.task_id, ?stage, "final check refused");
                return Err(ServerError::BadRequest(format!(
                    "task is {stage}, final check needs 100% progress"
                )));
            }
            record.final_check_status = FinalCheckStatus::Approved;
            Ok(())
        })
    })?;

    info!(plan_id = %plan_id, flat_no = task.flat_no, task_id = task.task_id, "final check approved");
    redirect(&task.back())
}

fn bill(app: &App, form: &HashMap<String, String>, perms: &PermissionSet) -> ResultResp {
    require(perms, Permission::Billing)?;
    let task = TaskForm::parse(form)?;
    let rate = match form.get("rate").map(String::as_str) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<f64>()
                .ok()
                .filter(|r| r.is_finite() && *r >= 0.0)
                .ok_or_else(|| ServerError::BadRequest(format!("invalid rate '{raw}'")))?,
        ),
    };

    let snapshot = snapshot(app)?;
    let plan_id = authoritative_plan(&snapshot, &task)?;
    let plan = snapshot.work_plan(&plan_id).ok_or(ServerError::NotFound)?;

    // One bill per task instance; the id makes a repeated submit a no-op upsert.
    let bill = ContractorBill {
        id: format!("{}:{}:{}", plan_id, task.flat_no, task.task_id),
        date: Utc::now().date_naive(),
        contractor_name: plan.contractor_name.clone(),
        billed_items: vec![BilledItem {
            plan_id: plan_id.clone(),
            flat_no: task.flat_no.to_string(),
            task_id: task.task_id.to_string(),
            rate,
            work_tile: plan.work_tile.clone(),
        }],
    };
    let target = TaskRef {
        plan_id: &plan_id,
        flat_no: task.flat_no,
        task_id: task.task_id,
    };

    app.db.with_conn(|conn| {
        work_plans::bill_task(conn, &target, &bill, |record| {
            let stage = stage_of(Some(record));
            if is_billing_eligible(stage) {
                Ok(())
            } else {
                warn!(plan_id = %plan_id, task_id = task.task_id, ?stage, "billing refused");
                Err(ServerError::BadRequest(format!(
                    "task is {stage}, only approved work can be billed"
                )))
            }
        })
    })?;

    info!(bill_id = %bill.id, "task billed");
    redirect(&task.back())
}

fn import(app: &App, collection: Collection, body: &[u8], perms: &PermissionSet) -> ResultResp {
    require(perms, Permission::Records)?;
    let id = app
        .db
        .with_conn(|conn| records::import_record(conn, collection, body))?;

    info!(collection = collection.name(), id = %id, "record stored");
    json_response(&json!({ "collection": collection.name(), "id": id }))
}
