use serde_json::Value;

use crate::JsonMap;
use crate::error::FormatError;
use crate::model::{
    DataType, Definition, ExternalDocs, Info, Method, PathSpec, Response, SecurityDefinition,
    SecurityKind, SecuritySetting, Tag,
};

use super::BuildContext;
use super::closure::drain_references;
use super::defined::format_defined_type;
use super::parameter::{code_label, format_parameter, format_response_schema};

/// Assemble the full document tree: metadata, tags, paths, registry-driven
/// definitions, security, the reference-closure drain, and security
/// definitions, in that key order.
pub(crate) fn build_document(
    ctx: &mut BuildContext<'_>,
    definition: &Definition,
) -> Result<JsonMap, FormatError> {
    let docs = ctx.options.include_documentation;
    let mut map = JsonMap::new();
    map.insert(
        "swagger".to_string(),
        Value::from(definition.swagger.as_str()),
    );
    if docs {
        if let Some(info) = &definition.info {
            map.insert("info".to_string(), Value::Object(build_info(info)));
        }
    }
    insert_opt_str(&mut map, "host", definition.host.as_deref());
    insert_opt_str(&mut map, "basePath", definition.base_path.as_deref());
    insert_string_list(&mut map, "schemes", &definition.schemes);
    insert_string_list(&mut map, "consumes", &definition.consumes);
    insert_string_list(&mut map, "produces", &definition.produces);

    if docs && !definition.tags.is_empty() {
        let tags = definition
            .tags
            .iter()
            .map(|tag| Value::Object(build_tag(tag)))
            .collect();
        map.insert("tags".to_string(), Value::Array(tags));
    }

    if !definition.paths.is_empty() {
        let mut path_map = JsonMap::new();
        for path in &definition.paths {
            let methods = build_path_methods(ctx, path).map_err(|e| {
                log::error!("could not format operations for path {}: {e}", path.path);
                FormatError::Operation {
                    path: path.path.clone(),
                    source: Box::new(e),
                }
            })?;
            // Multiple path entries with the same URL template merge into one
            // path-map entry.
            let entry = path_map
                .entry(path.path.clone())
                .or_insert_with(|| Value::Object(JsonMap::new()));
            if let Value::Object(existing) = entry {
                for (verb, method) in methods {
                    existing.insert(verb, method);
                }
            }
        }
        map.insert("paths".to_string(), Value::Object(path_map));
    }

    // Every type the registry declares under the document's own namespace is
    // emitted, referenced or not; records first, then scalars.
    let mut definitions = JsonMap::new();
    for ty in definition.registry.record_types(&definition.id) {
        add_registry_type(ctx, &mut definitions, ty)?;
    }
    for ty in definition.registry.scalar_types(&definition.id) {
        add_registry_type(ctx, &mut definitions, ty)?;
    }
    map.insert("definitions".to_string(), Value::Object(definitions));

    if !definition.global_security.is_empty() {
        map.insert(
            "security".to_string(),
            build_security_settings(&definition.global_security),
        );
    }

    // Writing out types can introduce references to further types, so the
    // queue is drained to a fixpoint.
    if let Some(Value::Object(definitions)) = map.get_mut("definitions") {
        drain_references(ctx, definitions)?;
    }

    if !definition.security_definitions.is_empty() {
        map.insert(
            "securityDefinitions".to_string(),
            Value::Object(build_security_definitions(
                docs,
                &definition.security_definitions,
            )),
        );
    }
    Ok(map)
}

fn add_registry_type(
    ctx: &mut BuildContext<'_>,
    definitions: &mut JsonMap,
    ty: &DataType,
) -> Result<(), FormatError> {
    let name = ty.name().unwrap_or_default().to_string();
    let schema = format_defined_type(ctx, ty, true).map_err(|e| {
        log::error!("could not format type {name}: {e}");
        FormatError::Definition {
            name: name.clone(),
            source: Box::new(e),
        }
    })?;
    definitions.insert(name, Value::Object(schema));
    Ok(())
}

fn build_path_methods(
    ctx: &mut BuildContext<'_>,
    path: &PathSpec,
) -> Result<Vec<(String, Value)>, FormatError> {
    let mut methods = Vec::new();
    for method in &path.methods {
        methods.push((
            method.method.as_str().to_string(),
            Value::Object(build_method(ctx, method)?),
        ));
    }
    Ok(methods)
}

fn build_method(ctx: &mut BuildContext<'_>, method: &Method) -> Result<JsonMap, FormatError> {
    let docs = ctx.options.include_documentation;
    let mut content = JsonMap::new();
    if docs {
        insert_opt_str(&mut content, "summary", method.summary.as_deref());
        insert_opt_str(&mut content, "description", method.description.as_deref());
    }
    insert_opt_str(&mut content, "operationId", method.operation_id.as_deref());
    insert_string_list(&mut content, "consumes", &method.consumes);
    insert_string_list(&mut content, "produces", &method.produces);
    if let Some(deprecated) = method.deprecated {
        content.insert("deprecated".to_string(), Value::Bool(deprecated));
    }
    insert_string_list(&mut content, "tags", &method.tags);
    if docs {
        if let Some(documentation) = &method.documentation {
            content.insert(
                "externalDocs".to_string(),
                Value::Object(build_external_docs(documentation)),
            );
        }
    }

    if !method.parameters.is_empty() {
        let mut parameters = Vec::new();
        for parameter in &method.parameters {
            parameters.push(Value::Object(format_parameter(ctx, parameter)?));
        }
        content.insert("parameters".to_string(), Value::Array(parameters));
    }
    insert_string_list(&mut content, "schemes", &method.schemes);

    if !method.responses.is_empty() {
        let mut responses = JsonMap::new();
        for response in &method.responses {
            responses.insert(
                code_label(response),
                Value::Object(build_response(ctx, response)?),
            );
        }
        content.insert("responses".to_string(), Value::Object(responses));
    }

    if !method.security.is_empty() {
        content.insert(
            "security".to_string(),
            build_security_settings(&method.security),
        );
    }

    for (key, value) in &method.extensions {
        content.insert(format!("x-{key}"), value.clone());
    }
    Ok(content)
}

fn build_response(ctx: &mut BuildContext<'_>, response: &Response) -> Result<JsonMap, FormatError> {
    let docs = ctx.options.include_documentation;
    let mut content = JsonMap::new();
    if docs {
        insert_opt_str(&mut content, "description", response.description.as_deref());
    }
    if !response.headers.is_empty() {
        let mut headers = JsonMap::new();
        for header in &response.headers {
            let mut formatted = format_parameter(ctx, header)?;
            // name and required are not legal on response header objects.
            formatted.shift_remove("name");
            formatted.shift_remove("required");
            headers.insert(header.name.clone(), Value::Object(formatted));
        }
        content.insert("headers".to_string(), Value::Object(headers));
    }
    if let Some(element) = &response.element {
        content.insert(
            "schema".to_string(),
            Value::Object(format_response_schema(ctx, response, element)?),
        );
    }
    Ok(content)
}

/// A list of `{scheme name: [scopes]}` requirement objects.
fn build_security_settings(settings: &[SecuritySetting]) -> Value {
    let list = settings
        .iter()
        .map(|setting| {
            let mut entry = JsonMap::new();
            let scopes = setting
                .scopes
                .iter()
                .map(|scope| Value::from(scope.as_str()))
                .collect();
            entry.insert(setting.name.clone(), Value::Array(scopes));
            Value::Object(entry)
        })
        .collect();
    Value::Array(list)
}

fn build_security_definitions(docs: bool, definitions: &[SecurityDefinition]) -> JsonMap {
    let mut all = JsonMap::new();
    for definition in definitions {
        let mut content = JsonMap::new();
        content.insert("type".to_string(), Value::from(definition.kind.as_str()));
        if docs {
            insert_opt_str(&mut content, "description", definition.description.as_deref());
        }
        match definition.kind {
            SecurityKind::ApiKey => {
                insert_opt_str(&mut content, "name", definition.field_name.as_deref());
                if let Some(location) = definition.location {
                    content.insert("in".to_string(), Value::from(location.as_str()));
                }
            }
            SecurityKind::OAuth2 => {
                if let Some(flow) = definition.flow {
                    content.insert("flow".to_string(), Value::from(flow.as_str()));
                }
                insert_opt_str(&mut content, "tokenUrl", definition.token_url.as_deref());
                insert_opt_str(
                    &mut content,
                    "authorizationUrl",
                    definition.authorization_url.as_deref(),
                );
                let scopes: JsonMap = definition
                    .scopes
                    .iter()
                    .map(|(scope, description)| (scope.clone(), Value::from(description.as_str())))
                    .collect();
                content.insert("scopes".to_string(), Value::Object(scopes));
            }
            SecurityKind::Basic => {}
        }
        all.insert(definition.name.clone(), Value::Object(content));
    }
    all
}

fn build_info(info: &Info) -> JsonMap {
    let mut content = JsonMap::new();
    insert_opt_str(&mut content, "title", info.title.as_deref());
    insert_opt_str(&mut content, "description", info.description.as_deref());
    insert_opt_str(&mut content, "termsOfService", info.terms_of_service.as_deref());
    if let Some(contact) = &info.contact {
        let mut contact_map = JsonMap::new();
        insert_opt_str(&mut contact_map, "name", contact.name.as_deref());
        insert_opt_str(&mut contact_map, "url", contact.url.as_deref());
        insert_opt_str(&mut contact_map, "email", contact.email.as_deref());
        content.insert("contact".to_string(), Value::Object(contact_map));
    }
    if let Some(license) = &info.license {
        let mut license_map = JsonMap::new();
        insert_opt_str(&mut license_map, "name", license.name.as_deref());
        insert_opt_str(&mut license_map, "url", license.url.as_deref());
        content.insert("license".to_string(), Value::Object(license_map));
    }
    insert_opt_str(&mut content, "version", info.version.as_deref());
    content
}

fn build_tag(tag: &Tag) -> JsonMap {
    let mut content = JsonMap::new();
    content.insert("name".to_string(), Value::from(tag.name.as_str()));
    insert_opt_str(&mut content, "description", tag.description.as_deref());
    content
}

fn build_external_docs(documentation: &ExternalDocs) -> JsonMap {
    let mut content = JsonMap::new();
    insert_opt_str(&mut content, "description", documentation.description.as_deref());
    insert_opt_str(&mut content, "url", documentation.url.as_deref());
    content
}

fn insert_opt_str(map: &mut JsonMap, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        map.insert(key.to_string(), Value::from(value));
    }
}

fn insert_string_list(map: &mut JsonMap, key: &str, values: &[String]) {
    if !values.is_empty() {
        let list = values.iter().map(|v| Value::from(v.as_str())).collect();
        map.insert(key.to_string(), Value::Array(list));
    }
}
