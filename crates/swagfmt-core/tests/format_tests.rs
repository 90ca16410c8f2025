use serde_json::{Value, json};

use swagfmt_core::error::FormatError;
use swagfmt_core::formatter::{format_type, format_type_as_json};
use swagfmt_core::model::{
    self, DataType, Definition, Element, HttpVerb, Info, Method, Parameter, ParameterLocation,
    PathSpec, Properties, RecordType, Response, ScalarKind, ScalarType, Tag, TypeRegistry,
};
use swagfmt_core::{FormatOptions, SwaggerFormatter};

const PETSTORE: &str = include_str!("fixtures/petstore.yaml");

fn string_element(name: &str) -> Element {
    Element {
        name: name.to_string(),
        data_type: DataType::Scalar(ScalarType::default()),
        properties: Properties::default(),
    }
}

fn optional(mut element: Element) -> Element {
    element.properties.min_occurs = Some(0);
    element
}

fn record(name: &str, namespace: &str, elements: Vec<Element>) -> RecordType {
    RecordType {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        elements,
        ..RecordType::default()
    }
}

fn definition_with_types(types: Vec<DataType>) -> Definition {
    Definition {
        id: "my.api".to_string(),
        registry: TypeRegistry { types },
        ..Definition::default()
    }
}

#[test]
fn test_record_definition_required_and_properties() {
    let pet = record(
        "Pet",
        "my.api",
        vec![string_element("name"), optional(string_element("tag"))],
    );
    let definition = definition_with_types(vec![DataType::Record(pet)]);

    let document = SwaggerFormatter::new().format(&definition).unwrap();
    assert_eq!(
        document["definitions"]["Pet"],
        json!({
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": {"type": "string"},
                "tag": {"type": "string"},
            },
        })
    );
}

#[test]
fn test_repeated_element_wraps_exactly_once() {
    let mut tags = string_element("tags");
    tags.properties.max_occurs = Some(0);
    let pet = record("Pet", "my.api", vec![tags]);
    let definition = definition_with_types(vec![DataType::Record(pet)]);

    let document = SwaggerFormatter::new().format(&definition).unwrap();
    let schema = &document["definitions"]["Pet"]["properties"]["tags"];
    assert_eq!(
        *schema,
        json!({"type": "array", "items": {"type": "string"}})
    );
    assert!(schema["items"].get("items").is_none());
}

#[test]
fn test_inheritance_emits_all_of() {
    let animal = record("Animal", "my.api", vec![string_element("name")]);
    let dog = RecordType {
        extends: Some(Box::new(DataType::Record(animal.clone()))),
        ..record("Dog", "my.api", vec![string_element("breed")])
    };
    let definition =
        definition_with_types(vec![DataType::Record(animal), DataType::Record(dog)]);

    let document = SwaggerFormatter::new().format(&definition).unwrap();
    assert_eq!(
        document["definitions"]["Dog"],
        json!({
            "type": "object",
            "allOf": [
                {"$ref": "#/definitions/Animal"},
                {
                    "type": "object",
                    "required": ["breed"],
                    "properties": {"breed": {"type": "string"}},
                },
            ],
        })
    );
}

#[test]
fn test_expand_inline_flattens_inheritance() {
    let animal = record("Animal", "my.api", vec![string_element("name")]);
    let dog = RecordType {
        extends: Some(Box::new(DataType::Record(animal.clone()))),
        ..record("Dog", "my.api", vec![string_element("breed")])
    };
    let definition =
        definition_with_types(vec![DataType::Record(animal), DataType::Record(dog)]);

    let options = FormatOptions {
        expand_inline: true,
        ..FormatOptions::default()
    };
    let document = SwaggerFormatter::with_options(options)
        .format(&definition)
        .unwrap();
    assert_eq!(
        document["definitions"]["Dog"],
        json!({
            "type": "object",
            "required": ["name", "breed"],
            "properties": {
                "name": {"type": "string"},
                "breed": {"type": "string"},
            },
        })
    );
}

#[test]
fn test_dynamic_name_child_becomes_additional_properties() {
    let item = RecordType {
        elements: vec![string_element("key"), string_element("value")],
        ..RecordType::default()
    };
    let entries = Element {
        name: "entries".to_string(),
        data_type: DataType::Record(item),
        properties: Properties {
            max_occurs: Some(0),
            dynamic_name: Some("key".to_string()),
            ..Properties::default()
        },
    };
    let env = record("Env", "my.api", vec![string_element("name"), entries]);
    let definition = definition_with_types(vec![DataType::Record(env)]);

    let document = SwaggerFormatter::new().format(&definition).unwrap();
    assert_eq!(
        document["definitions"]["Env"],
        json!({
            "type": "object",
            "required": ["name"],
            "properties": {"name": {"type": "string"}},
            "additionalProperties": {
                "type": "object",
                "required": ["value"],
                "properties": {"value": {"type": "string"}},
            },
        })
    );
}

#[test]
fn test_attribute_child_gets_xml_marker() {
    let pet = record("Pet", "my.api", vec![string_element("@id")]);
    let definition = definition_with_types(vec![DataType::Record(pet)]);

    let document = SwaggerFormatter::new().format(&definition).unwrap();
    assert_eq!(
        document["definitions"]["Pet"],
        json!({
            "type": "object",
            "required": ["id"],
            "properties": {
                "id": {"type": "string", "xml": {"attribute": true, "name": "id"}},
            },
        })
    );
}

#[test]
fn test_reference_closure_is_transitive_and_deterministic() {
    let address = RecordType {
        id: Some("crm.Address".to_string()),
        ..record("Address", "crm", vec![string_element("city")])
    };
    let customer = RecordType {
        id: Some("crm.Customer".to_string()),
        ..record(
            "Customer",
            "crm",
            vec![
                string_element("name"),
                Element {
                    name: "address".to_string(),
                    data_type: DataType::Record(address),
                    properties: Properties::default(),
                },
            ],
        )
    };
    let order = record(
        "Order",
        "my.api",
        vec![Element {
            name: "customer".to_string(),
            data_type: DataType::Record(customer),
            properties: Properties::default(),
        }],
    );
    let definition = definition_with_types(vec![DataType::Record(order)]);

    let options = FormatOptions {
        allow_defined_type_references: true,
        ..FormatOptions::default()
    };
    let formatter = SwaggerFormatter::with_options(options);
    let document = formatter.format(&definition).unwrap();

    let definitions = document["definitions"].as_object().unwrap();
    let keys: Vec<&str> = definitions.keys().map(String::as_str).collect();
    assert_eq!(keys, ["Order", "crm.Customer", "crm.Address"]);

    assert_eq!(
        definitions["Order"]["properties"]["customer"],
        json!({"$ref": "#/definitions/crm.Customer"})
    );
    assert_eq!(
        definitions["crm.Customer"]["properties"]["address"],
        json!({"$ref": "#/definitions/crm.Address"})
    );
    assert_eq!(
        definitions["crm.Address"],
        json!({
            "type": "object",
            "required": ["city"],
            "properties": {"city": {"type": "string"}},
        })
    );

    // A second run over the same model yields the identical document.
    assert_eq!(document, formatter.format(&definition).unwrap());
}

#[test]
fn test_external_record_without_references_is_inlined() {
    let customer = RecordType {
        id: Some("crm.Customer".to_string()),
        ..record("Customer", "crm", vec![string_element("name")])
    };
    let order = record(
        "Order",
        "my.api",
        vec![Element {
            name: "customer".to_string(),
            data_type: DataType::Record(customer),
            properties: Properties::default(),
        }],
    );
    let definition = definition_with_types(vec![DataType::Record(order)]);

    let document = SwaggerFormatter::new().format(&definition).unwrap();
    let definitions = document["definitions"].as_object().unwrap();
    assert!(!definitions.contains_key("crm.Customer"));
    assert_eq!(
        definitions["Order"]["properties"]["customer"],
        json!({
            "type": "object",
            "required": ["name"],
            "properties": {"name": {"type": "string"}},
        })
    );
}

#[test]
fn test_response_array_carries_item_bounds() {
    let pet_name = ScalarType {
        kind: ScalarKind::String,
        name: Some("PetName".to_string()),
        namespace: Some("my.api".to_string()),
        ..ScalarType::default()
    };
    let mut definition = definition_with_types(vec![DataType::Scalar(pet_name.clone())]);
    definition.paths = vec![PathSpec {
        path: "/pets".to_string(),
        methods: vec![Method {
            method: HttpVerb::Get,
            responses: vec![Response {
                code: Some(200),
                element: Some(Element {
                    name: "names".to_string(),
                    data_type: DataType::Scalar(pet_name),
                    properties: Properties {
                        max_occurs: Some(5),
                        ..Properties::default()
                    },
                }),
                ..Response::default()
            }],
            ..Method::default()
        }],
    }];

    let document = SwaggerFormatter::new().format(&definition).unwrap();
    assert_eq!(
        document["paths"]["/pets"]["get"]["responses"]["200"]["schema"],
        json!({
            "type": "array",
            "maxItems": 5,
            "minItems": 1,
            "items": {"$ref": "#/definitions/PetName"},
        })
    );
    assert_eq!(document["definitions"]["PetName"], json!({"type": "string"}));
}

#[test]
fn test_record_parameter_outside_body_fails() {
    let filter = record("Filter", "my.api", vec![string_element("field")]);
    let mut definition = definition_with_types(vec![DataType::Record(filter.clone())]);
    definition.paths = vec![PathSpec {
        path: "/pets".to_string(),
        methods: vec![Method {
            method: HttpVerb::Get,
            parameters: vec![Parameter {
                name: "filter".to_string(),
                location: Some(ParameterLocation::Query),
                element: Element {
                    name: "filter".to_string(),
                    data_type: DataType::Record(filter),
                    properties: Properties::default(),
                },
                ..Parameter::default()
            }],
            ..Method::default()
        }],
    }];

    let err = SwaggerFormatter::new().format(&definition).unwrap_err();
    match err {
        FormatError::Operation { path, source } => {
            assert_eq!(path, "/pets");
            assert!(matches!(
                *source,
                FormatError::ComplexParameterOutsideBody(name) if name == "filter"
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unregistered_record_body_parameter_fails() {
    let pet = record("Pet", "other.api", vec![string_element("name")]);
    let mut definition = definition_with_types(vec![]);
    definition.paths = vec![PathSpec {
        path: "/pets".to_string(),
        methods: vec![Method {
            method: HttpVerb::Post,
            parameters: vec![Parameter {
                name: "pet".to_string(),
                location: Some(ParameterLocation::Body),
                element: Element {
                    name: "pet".to_string(),
                    data_type: DataType::Record(pet),
                    properties: Properties::default(),
                },
                ..Parameter::default()
            }],
            ..Method::default()
        }],
    }];

    let err = SwaggerFormatter::new().format(&definition).unwrap_err();
    match err {
        FormatError::Operation { source, .. } => {
            assert!(matches!(
                *source,
                FormatError::ComplexParameterNotDefined(name) if name == "pet"
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unregistered_record_response_fails_with_code() {
    let pet = record("Pet", "other.api", vec![string_element("name")]);
    let mut definition = definition_with_types(vec![]);
    definition.paths = vec![PathSpec {
        path: "/pets".to_string(),
        methods: vec![Method {
            method: HttpVerb::Get,
            responses: vec![Response {
                code: Some(200),
                element: Some(Element {
                    name: "pet".to_string(),
                    data_type: DataType::Record(pet),
                    properties: Properties::default(),
                }),
                ..Response::default()
            }],
            ..Method::default()
        }],
    }];

    let err = SwaggerFormatter::new().format(&definition).unwrap_err();
    match err {
        FormatError::Operation { source, .. } => {
            assert!(matches!(
                *source,
                FormatError::ComplexResponseNotDefined(code) if code == "200"
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_same_path_entries_merge() {
    let mut definition = definition_with_types(vec![]);
    definition.paths = vec![
        PathSpec {
            path: "/pets".to_string(),
            methods: vec![Method {
                method: HttpVerb::Get,
                ..Method::default()
            }],
        },
        PathSpec {
            path: "/pets".to_string(),
            methods: vec![Method {
                method: HttpVerb::Post,
                ..Method::default()
            }],
        },
    ];

    let document = SwaggerFormatter::new().format(&definition).unwrap();
    let paths = document["paths"].as_object().unwrap();
    assert_eq!(paths.len(), 1);
    let pets = paths["/pets"].as_object().unwrap();
    assert!(pets.contains_key("get"));
    assert!(pets.contains_key("post"));
}

#[test]
fn test_documentation_can_be_dropped() {
    let mut definition = definition_with_types(vec![]);
    definition.info = Some(Info {
        title: Some("My API".to_string()),
        version: Some("1.0".to_string()),
        ..Info::default()
    });
    definition.tags = vec![Tag {
        name: "pets".to_string(),
        description: None,
    }];
    definition.paths = vec![PathSpec {
        path: "/pets".to_string(),
        methods: vec![Method {
            method: HttpVerb::Get,
            summary: Some("List all pets".to_string()),
            description: Some("Returns every pet.".to_string()),
            operation_id: Some("listPets".to_string()),
            ..Method::default()
        }],
    }];

    let options = FormatOptions {
        include_documentation: false,
        ..FormatOptions::default()
    };
    let document = SwaggerFormatter::with_options(options)
        .format(&definition)
        .unwrap();
    assert!(document.get("info").is_none());
    assert!(document.get("tags").is_none());
    let get = &document["paths"]["/pets"]["get"];
    assert!(get.get("summary").is_none());
    assert!(get.get("description").is_none());
    assert_eq!(get["operationId"], json!("listPets"));
}

#[test]
fn test_format_type_outside_document() {
    let pet = DataType::Record(record("Pet", "my.api", vec![string_element("name")]));
    let schema = format_type(&pet, &FormatOptions::default()).unwrap();
    assert_eq!(
        Value::Object(schema),
        json!({
            "type": "object",
            "required": ["name"],
            "properties": {"name": {"type": "string"}},
        })
    );

    let rendered = format_type_as_json(&pet).unwrap();
    let parsed: Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(parsed["type"], json!("object"));
}

#[test]
fn test_petstore_fixture_end_to_end() {
    let definition = model::from_yaml(PETSTORE).unwrap();
    let document = SwaggerFormatter::new().format(&definition).unwrap();

    assert_eq!(
        Value::Object(document),
        json!({
            "swagger": "2.0",
            "info": {"title": "Swagger Petstore", "version": "1.0.0"},
            "host": "petstore.example.com",
            "basePath": "/v1",
            "schemes": ["https"],
            "consumes": ["application/json"],
            "produces": ["application/json"],
            "tags": [{"name": "pets", "description": "Pet operations"}],
            "paths": {
                "/pets": {
                    "get": {
                        "summary": "List all pets",
                        "operationId": "listPets",
                        "tags": ["pets"],
                        "parameters": [
                            {"in": "query", "type": "integer", "format": "int32", "name": "limit"},
                        ],
                        "responses": {
                            "200": {
                                "description": "A paged array of pets",
                                "headers": {"x-next": {"type": "string"}},
                                "schema": {
                                    "type": "array",
                                    "minItems": 1,
                                    "items": {"$ref": "#/definitions/Pet"},
                                },
                            },
                        },
                    },
                    "post": {
                        "summary": "Create a pet",
                        "operationId": "createPets",
                        "tags": ["pets"],
                        "parameters": [
                            {"in": "body", "schema": {"$ref": "#/definitions/Pet"}, "name": "pet"},
                        ],
                        "responses": {
                            "201": {"description": "Null response"},
                        },
                    },
                },
            },
            "definitions": {
                "Pet": {
                    "type": "object",
                    "required": ["id", "name"],
                    "properties": {
                        "id": {"type": "integer", "format": "int64"},
                        "name": {"type": "string"},
                        "tag": {"type": "string"},
                    },
                },
            },
            "security": [{"api_key": []}],
            "securityDefinitions": {
                "api_key": {"type": "apiKey", "name": "X-Api-Key", "in": "header"},
            },
        })
    );
}

#[test]
fn test_security_definition_kinds() {
    let yaml = r#"
id: my.api
securityDefinitions:
  - name: basic_auth
    type: basic
  - name: petstore_auth
    type: oauth2
    flow: accessCode
    tokenUrl: https://example.com/token
    authorizationUrl: https://example.com/authorize
    scopes:
      write:pets: modify pets
      read:pets: read pets
"#;
    let definition = model::from_yaml(yaml).unwrap();
    let document = SwaggerFormatter::new().format(&definition).unwrap();

    assert_eq!(
        document["securityDefinitions"],
        json!({
            "basic_auth": {"type": "basic"},
            "petstore_auth": {
                "type": "oauth2",
                "flow": "accessCode",
                "tokenUrl": "https://example.com/token",
                "authorizationUrl": "https://example.com/authorize",
                "scopes": {"write:pets": "modify pets", "read:pets": "read pets"},
            },
        })
    );
}
