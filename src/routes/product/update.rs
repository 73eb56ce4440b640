use crate::forms;
use crate::services::products::{self, ProductService};
use crate::views;
use actix_web::{put, web, HttpResponse};

#[tracing::instrument(name = "Update product.", skip(service))]
#[put("/{id}")]
pub async fn item(
    path: web::Path<(i32,)>,
    form: web::Json<forms::ProductForm>,
    service: web::Data<ProductService>,
) -> products::Result<HttpResponse> {
    let (id,) = path.into_inner();
    let product = service.update(id, form.into_inner()).await?;

    Ok(HttpResponse::Ok().json(views::product::Product::from(product)))
}
