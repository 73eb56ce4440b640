use crate::helpers::JsonResponse;
use crate::services::products::{self, ProductService, DELETED_MESSAGE};
use actix_web::{delete, web, HttpResponse};

#[tracing::instrument(name = "Delete product.", skip(service))]
#[delete("/{id}")]
pub async fn item(
    path: web::Path<(i32,)>,
    service: web::Data<ProductService>,
) -> products::Result<HttpResponse> {
    let (id,) = path.into_inner();
    service.delete(id).await?;

    Ok(JsonResponse::ok(DELETED_MESSAGE))
}
