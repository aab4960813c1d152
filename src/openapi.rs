//! OpenAPI 3 document for the CRUD surface, assembled per resource from the same
//! `Resource` impls that drive the router.

use crate::error::{ErrorBody, ErrorDetail};
use crate::model::{Animals, Consultations, Secretaries, Veterinarians};
use crate::resource::Resource;
use utoipa::openapi::path::{HttpMethod, OperationBuilder, ParameterBuilder, ParameterIn, PathItemBuilder};
use utoipa::openapi::request_body::RequestBodyBuilder;
use utoipa::openapi::{
    ArrayBuilder, ComponentsBuilder, ContentBuilder, Info, KnownFormat, ObjectBuilder, OpenApi, OpenApiBuilder,
    PathsBuilder, Ref, RefOr, Required, Response, ResponseBuilder, Schema, SchemaFormat, Type,
};
use utoipa::ToSchema;

const JSON: &str = "application/json";

fn schema_ref(name: &str) -> RefOr<Schema> {
    RefOr::Ref(Ref::from_schema_name(name))
}

fn array_of(name: &str) -> RefOr<Schema> {
    RefOr::T(Schema::Array(ArrayBuilder::new().items(schema_ref(name)).build()))
}

fn json_response(description: &str, schema: RefOr<Schema>) -> RefOr<Response> {
    RefOr::T(
        ResponseBuilder::new()
            .description(description)
            .content(JSON, ContentBuilder::new().schema(Some(schema)).build())
            .build(),
    )
}

fn error_response(description: &str) -> RefOr<Response> {
    json_response(description, schema_ref("ErrorBody"))
}

fn empty_response(description: &str) -> RefOr<Response> {
    RefOr::T(ResponseBuilder::new().description(description).build())
}

fn id_parameter() -> utoipa::openapi::path::Parameter {
    ParameterBuilder::new()
        .name("id")
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .schema(Some(RefOr::T(Schema::Object(
            ObjectBuilder::new()
                .schema_type(Type::Integer)
                .format(Some(SchemaFormat::KnownFormat(KnownFormat::Int64)))
                .build(),
        ))))
        .build()
}

fn input_body(input: &str) -> utoipa::openapi::request_body::RequestBody {
    RequestBodyBuilder::new()
        .content(JSON, ContentBuilder::new().schema(Some(schema_ref(input))).build())
        .required(Some(Required::True))
        .build()
}

/// Adds the collection and item paths of `R` plus its schemas.
fn add_resource<R: Resource>(paths: PathsBuilder, components: ComponentsBuilder) -> (PathsBuilder, ComponentsBuilder) {
    let record = <R::Record as ToSchema>::name();
    let input = <R::Input as ToSchema>::name();
    let tag = R::PATH;

    let list = OperationBuilder::new()
        .operation_id(Some(format!("list_{}", R::PATH)))
        .summary(Some(format!("List every {}", R::LABEL)))
        .tag(tag)
        .response("200", json_response("All records ordered by id", array_of(&record)))
        .response("503", error_response("Store unavailable"));
    let create = OperationBuilder::new()
        .operation_id(Some(format!("create_{}", R::PATH)))
        .summary(Some(format!("Create a {}", R::LABEL)))
        .tag(tag)
        .request_body(Some(input_body(&input)))
        .response("201", json_response("Created record", schema_ref(&record)))
        .response("404", error_response("Referenced record not found"))
        .response("413", error_response("Body over 1 MiB"))
        .response("422", error_response("Validation failed"));
    let read = OperationBuilder::new()
        .operation_id(Some(format!("read_{}", R::PATH)))
        .summary(Some(format!("Fetch a {} by id", R::LABEL)))
        .tag(tag)
        .parameter(id_parameter())
        .response("200", json_response("Record", schema_ref(&record)))
        .response("400", error_response("Malformed id"))
        .response("404", error_response("Not found"));
    let update = OperationBuilder::new()
        .operation_id(Some(format!("update_{}", R::PATH)))
        .summary(Some(format!("Replace a {}", R::LABEL)))
        .tag(tag)
        .parameter(id_parameter())
        .request_body(Some(input_body(&input)))
        .response("200", json_response("Updated record", schema_ref(&record)))
        .response("404", error_response("Not found"))
        .response("413", error_response("Body over 1 MiB"))
        .response("422", error_response("Validation failed"));
    let delete = OperationBuilder::new()
        .operation_id(Some(format!("delete_{}", R::PATH)))
        .summary(Some(format!("Delete a {}", R::LABEL)))
        .tag(tag)
        .parameter(id_parameter())
        .response("204", empty_response("Deleted"))
        .response("404", error_response("Not found"))
        .response("409", error_response("Still referenced"));

    let paths = paths
        .path(
            format!("/{}", R::PATH),
            PathItemBuilder::new()
                .operation(HttpMethod::Get, list)
                .operation(HttpMethod::Post, create)
                .build(),
        )
        .path(
            format!("/{}/{{id}}", R::PATH),
            PathItemBuilder::new()
                .operation(HttpMethod::Get, read)
                .operation(HttpMethod::Put, update)
                .operation(HttpMethod::Delete, delete)
                .build(),
        );
    let components = components.schema_from::<R::Record>().schema_from::<R::Input>();
    (paths, components)
}

/// Document describing every resource route and schema.
pub fn api_doc() -> OpenApi {
    let paths = PathsBuilder::new();
    let components = ComponentsBuilder::new()
        .schema_from::<crate::model::ConsultationStatus>()
        .schema_from::<ErrorBody>()
        .schema_from::<ErrorDetail>();
    let (paths, components) = add_resource::<Consultations>(paths, components);
    let (paths, components) = add_resource::<Veterinarians>(paths, components);
    let (paths, components) = add_resource::<Animals>(paths, components);
    let (paths, components) = add_resource::<Secretaries>(paths, components);
    OpenApiBuilder::new()
        .info(Info::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")))
        .paths(paths.build())
        .components(Some(components.build()))
        .build()
}
