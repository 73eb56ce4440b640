use crate::services::products::{self, ProductService};
use crate::views;
use actix_web::{get, web, HttpResponse};

#[tracing::instrument(name = "Get all products.", skip(service))]
#[get("")]
pub async fn list(service: web::Data<ProductService>) -> products::Result<HttpResponse> {
    let products = service
        .list()
        .await?
        .into_iter()
        .map(Into::into)
        .collect::<Vec<views::product::Product>>();

    Ok(HttpResponse::Ok().json(products))
}

#[tracing::instrument(name = "Get product.", skip(service))]
#[get("/{id}")]
pub async fn item(
    path: web::Path<(i32,)>,
    service: web::Data<ProductService>,
) -> products::Result<HttpResponse> {
    let (id,) = path.into_inner();
    let product = service.show(id).await?;

    Ok(HttpResponse::Ok().json(views::product::Product::from(product)))
}
