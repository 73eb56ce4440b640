use crate::forms;
use crate::services::products::{self, ProductService};
use crate::views;
use actix_web::{post, web, HttpResponse};

#[tracing::instrument(name = "Add product.", skip(service))]
#[post("")]
pub async fn add(
    form: web::Json<forms::ProductForm>,
    service: web::Data<ProductService>,
) -> products::Result<HttpResponse> {
    let product = service.create(form.into_inner()).await?;

    Ok(HttpResponse::Created().json(views::product::Product::from(product)))
}
