//! API description
//!
//! The OpenAPI document is generated from [`ENDPOINTS`], the same table the
//! router is checked against, and rendered by a Swagger UI page.

use crate::api::handlers::AppState;
use axum::{extract::State, response::Html, Json};
use serde_json::{json, Map, Value};

/// Path of the machine-readable document
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Path of the interactive documentation page
pub const DOCS_PATH: &str = "/api-docs";

const TITLE: &str = "QA Learning API";
const DESCRIPTION: &str = "A hands-on playground for API testing: user registration, \
login with token-based authentication, and retrieving, updating and deleting users.";

/// Who may call an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Bearer,
    /// Public unless `security.protect_user_routes` is set
    BearerWhenConfigured,
}

impl Access {
    pub fn requires_token(self, protect_user_routes: bool) -> bool {
        match self {
            Access::Public => false,
            Access::Bearer => true,
            Access::BearerWhenConfigured => protect_user_routes,
        }
    }
}

/// Named body shapes, emitted under `components/schemas`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Credentials,
    UpdateUser,
    User,
    UserList,
    Token,
    Text,
}

impl Schema {
    fn reference(self) -> Value {
        match self {
            Schema::Credentials => json!({ "$ref": "#/components/schemas/Credentials" }),
            Schema::UpdateUser => json!({ "$ref": "#/components/schemas/UpdateUser" }),
            Schema::User => json!({ "$ref": "#/components/schemas/User" }),
            Schema::UserList => json!({
                "type": "array",
                "items": { "$ref": "#/components/schemas/User" }
            }),
            Schema::Token => json!({ "$ref": "#/components/schemas/Token" }),
            Schema::Text => json!({ "type": "string" }),
        }
    }

    fn media_type(self) -> &'static str {
        match self {
            Schema::Text => "text/plain",
            _ => "application/json",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ApiResponse {
    pub status: u16,
    pub description: &'static str,
    pub body: Schema,
}

#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    /// Lowercase HTTP method
    pub method: &'static str,
    /// OpenAPI-style path, parameters as `{name}`
    pub path: &'static str,
    pub summary: &'static str,
    pub access: Access,
    pub request: Option<Schema>,
    pub responses: &'static [ApiResponse],
}

const NOT_FOUND: ApiResponse = ApiResponse {
    status: 404,
    description: "User not found",
    body: Schema::Text,
};

pub const ENDPOINTS: &[Endpoint] = &[
    Endpoint {
        method: "post",
        path: "/api/register",
        summary: "Register a new user",
        access: Access::Public,
        request: Some(Schema::Credentials),
        responses: &[ApiResponse {
            status: 201,
            description: "User registered successfully",
            body: Schema::User,
        }],
    },
    Endpoint {
        method: "post",
        path: "/api/login",
        summary: "Log in a user and generate an auth token",
        access: Access::Public,
        request: Some(Schema::Credentials),
        responses: &[
            ApiResponse {
                status: 200,
                description: "Login successful, token generated",
                body: Schema::Token,
            },
            ApiResponse {
                status: 401,
                description: "Invalid credentials",
                body: Schema::Text,
            },
        ],
    },
    Endpoint {
        method: "get",
        path: "/api/users",
        summary: "Returns a list of users",
        access: Access::Bearer,
        request: None,
        responses: &[ApiResponse {
            status: 200,
            description: "A list of users",
            body: Schema::UserList,
        }],
    },
    Endpoint {
        method: "get",
        path: "/api/users/{id}",
        summary: "Get a user by ID",
        access: Access::BearerWhenConfigured,
        request: None,
        responses: &[
            ApiResponse {
                status: 200,
                description: "A single user",
                body: Schema::User,
            },
            NOT_FOUND,
        ],
    },
    Endpoint {
        method: "put",
        path: "/api/users/{id}",
        summary: "Update a user by ID",
        access: Access::BearerWhenConfigured,
        request: Some(Schema::UpdateUser),
        responses: &[
            ApiResponse {
                status: 200,
                description: "User updated successfully",
                body: Schema::Text,
            },
            NOT_FOUND,
        ],
    },
    Endpoint {
        method: "patch",
        path: "/api/users/{id}",
        summary: "Partially update a user by ID",
        access: Access::BearerWhenConfigured,
        request: Some(Schema::UpdateUser),
        responses: &[
            ApiResponse {
                status: 200,
                description: "User updated successfully",
                body: Schema::Text,
            },
            NOT_FOUND,
        ],
    },
    Endpoint {
        method: "delete",
        path: "/api/users/{id}",
        summary: "Delete a user by ID",
        access: Access::BearerWhenConfigured,
        request: None,
        responses: &[
            ApiResponse {
                status: 200,
                description: "User deleted successfully",
                body: Schema::Text,
            },
            NOT_FOUND,
        ],
    },
];

fn content(schema: Schema) -> Value {
    json!({ schema.media_type(): { "schema": schema.reference() } })
}

fn operation(endpoint: &Endpoint, protect_user_routes: bool) -> Value {
    let mut responses = Map::new();
    for response in endpoint.responses {
        responses.insert(
            response.status.to_string(),
            json!({
                "description": response.description,
                "content": content(response.body),
            }),
        );
    }

    let mut op = json!({
        "summary": endpoint.summary,
        "responses": responses,
    });

    if endpoint.path.contains("{id}") {
        op["parameters"] = json!([{
            "in": "path",
            "name": "id",
            "required": true,
            "schema": { "type": "integer" },
            "description": "The user ID",
        }]);
    }

    if let Some(schema) = endpoint.request {
        op["requestBody"] = json!({ "required": true, "content": content(schema) });
    }

    if endpoint.access.requires_token(protect_user_routes) {
        op["security"] = json!([{ "bearerAuth": [] }]);
        op["responses"]["401"] = json!({
            "description": "Unauthorized",
            "content": content(Schema::Text),
        });
        op["responses"]["403"] = json!({
            "description": "Forbidden",
            "content": content(Schema::Text),
        });
    }

    op
}

/// Build the OpenAPI 3.0 document for the current gating mode
pub fn openapi_document(protect_user_routes: bool) -> Value {
    let mut paths = Map::new();
    for endpoint in ENDPOINTS {
        let item = paths
            .entry(endpoint.path.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        item[endpoint.method] = operation(endpoint, protect_user_routes);
    }

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": TITLE,
            "version": env!("CARGO_PKG_VERSION"),
            "description": DESCRIPTION,
        },
        "paths": paths,
        "components": {
            "securitySchemes": {
                "bearerAuth": { "type": "http", "scheme": "bearer", "bearerFormat": "JWT" }
            },
            "schemas": {
                "Credentials": {
                    "type": "object",
                    "properties": {
                        "username": { "type": "string" },
                        "password": { "type": "string" }
                    }
                },
                "UpdateUser": {
                    "type": "object",
                    "properties": { "name": { "type": "string" } }
                },
                "User": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer" },
                        "username": { "type": "string" }
                    }
                },
                "Token": {
                    "type": "object",
                    "properties": { "token": { "type": "string" } }
                }
            }
        }
    })
}

/// Handler for GET /api-docs/openapi.json
pub async fn openapi_json(State(state): State<AppState>) -> Json<Value> {
    Json(openapi_document(state.protect_user_routes))
}

/// Handler for GET /api-docs - Swagger UI page
pub async fn docs_page() -> Html<String> {
    Html(format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>{title}</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {{
      window.ui = SwaggerUIBundle({{ url: "{spec}", dom_id: "#swagger-ui" }});
    }};
  </script>
</body>
</html>"##,
        title = TITLE,
        spec = OPENAPI_PATH,
    ))
}
