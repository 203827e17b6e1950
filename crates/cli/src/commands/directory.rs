use anyhow::Result;
use aplus_service::{PageRequest, TutorFilter};
use serde_json::json;

use crate::build_services;

pub(crate) async fn run_refresh() -> Result<()> {
    let query_service = build_services()?.query;
    let report = query_service.refresh().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) async fn run_list(
    city: Option<String>,
    subject: Option<String>,
    q: Option<String>,
    offset: usize,
    limit: usize,
) -> Result<()> {
    let query_service = build_services()?.query;
    let filter = TutorFilter { city, subject, q };
    let page = query_service.list_tutors(&filter, PageRequest::new(offset, limit)).await?;
    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}

pub(crate) async fn run_check_id(id_card: &str) -> Result<()> {
    let query_service = build_services()?.query;
    let registered = query_service.check_id_registered(id_card).await?;
    let body = json!({"id_card": id_card, "registered": registered});
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
