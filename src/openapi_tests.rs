#[cfg(test)]
mod tests {
    use crate::schemas::ApiDoc;
    use utoipa::openapi::PathItemType;
    use utoipa::OpenApi;

    #[test]
    fn test_openapi_schema_generation() {
        let openapi = ApiDoc::openapi();

        assert!(openapi.components.is_some());
        let components = openapi.components.as_ref().unwrap();

        assert!(components.schemas.contains_key("UserAccount"));
        assert!(components.schemas.contains_key("DeleteUserAccountRequest"));
        assert!(components.schemas.contains_key("HealthResponse"));

        assert!(serde_json::to_string(&openapi).is_ok());
    }

    #[test]
    fn test_user_account_schema_uses_wire_names() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().unwrap();
        let schema = components.schemas.get("UserAccount").unwrap();

        if let utoipa::openapi::RefOr::T(utoipa::openapi::schema::Schema::Object(obj)) = schema {
            let properties = &obj.properties;
            for key in ["Id", "IdNumber", "FullName", "Username", "Password", "Section", "Role"] {
                assert!(properties.contains_key(key), "missing property {}", key);
            }
        } else {
            panic!("UserAccount should be an object schema");
        }
    }

    #[test]
    fn test_openapi_paths_cover_every_route() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;

        for path in ["/health", "/UserAccounts", "/UserAccounts/Search", "/UserAccounts/Count", "/UserAccounts/Id"] {
            let item = paths.get(path).unwrap_or_else(|| panic!("missing path {}", path));
            assert!(item.operations.contains_key(&PathItemType::Get));
        }

        for path in ["/UserAccounts/Insert", "/UserAccounts/Update", "/UserAccounts/Delete"] {
            let item = paths.get(path).unwrap_or_else(|| panic!("missing path {}", path));
            let post = item.operations.get(&PathItemType::Post).unwrap();
            assert!(post.responses.responses.contains_key("405"));
        }
    }

    #[test]
    fn test_id_lookup_documents_bad_request() {
        let openapi = ApiDoc::openapi();
        let item = openapi.paths.paths.get("/UserAccounts/Id").unwrap();
        let get = item.operations.get(&PathItemType::Get).unwrap();

        assert!(get.responses.responses.contains_key("200"));
        assert!(get.responses.responses.contains_key("400"));
    }
}
