use {
    actix_web::{http::header::ContentType, web, HttpResponse},
    serde::Deserialize,
    sentiment_core::pipeline::{AnalysisReport, Analyzer},
    crate::{error::WebError, templates::Templates},
};

#[derive(Deserialize, Debug)]
pub struct SubmitForm {
    #[serde(default)]
    url: String,
}

pub async fn index(templates: web::Data<Templates>) -> Result<HttpResponse, WebError> {
    html(templates.index::<AnalysisReport>(None, None)?)
}

/// Invalid URLs and upstream failures are shown on the form page itself.
pub async fn submit(
    form: web::Form<SubmitForm>,
    analyzer: web::Data<Analyzer>,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, WebError> {
    let page = match analyzer.analyze(form.url.trim()).await {
        Ok(report) => templates.index(Some(&report), None)?,
        Err(err) => templates.index::<AnalysisReport>(None, Some(&err.user_message()))?,
    };

    html(page)
}

pub async fn not_found(templates: web::Data<Templates>) -> Result<HttpResponse, WebError> {
    Ok(HttpResponse::NotFound()
        .content_type(ContentType::html())
        .body(templates.not_found()?))
}

fn html(page: String) -> Result<HttpResponse, WebError> {
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(page))
}
