//! HTTP-level tests of `RegisterClient` against a mock register.

use std::time::Duration;

use regsync_client::{
    ClientSettings, DocumentFile, Register, RegisterApi, RegisterClient, RegisterError,
    RegisterSettings, UploadTarget,
};
use regsync_core::{DocumentId, EnumRef, ProjectId, RunId};
use regsync_template::DocumentTemplate;
use wiremock::matchers::{body_string_contains, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AUTH: &str = "Basic cG9sZWFyeTpzZWNyZXQ=";

const SCHEMA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<RegisterSchema projectId="1879048422" projectName="Breeze Tower">
  <EntityCreationSchemaFields>
    <MultiValueSchemaField>
      <Attributes><EntityField MandatoryStatus="MANDATORY"/></Attributes>
      <DataType>LONG</DataType>
      <FieldName>Type</FieldName>
      <Identifier>DocumentTypeId</Identifier>
      <SchemaValues>
        <SchemaValue><Id>101</Id><Value>Drawing</Value></SchemaValue>
      </SchemaValues>
    </MultiValueSchemaField>
    <SingleValueSchemaField>
      <Attributes><EntityField MandatoryStatus="MANDATORY"/></Attributes>
      <DataType>STRING</DataType>
      <FieldName>Document No</FieldName>
      <Identifier>DocumentNumber</Identifier>
    </SingleValueSchemaField>
  </EntityCreationSchemaFields>
</RegisterSchema>"#;

const SEARCH: &str = r#"<RegisterSearch TotalResults="1">
  <SearchResults>
    <Document DocumentId="271341877549097225">
      <DocumentNumber>regsync-20261018-4821-a</DocumentNumber>
      <DocumentStatus>Approved</DocumentStatus>
      <DocumentType>Drawing</DocumentType>
      <Filename>document.txt</Filename>
      <Revision>1</Revision>
      <Title>Sleek Marble Lamp</Title>
    </Document>
  </SearchResults>
</RegisterSearch>"#;

fn client(server: &MockServer) -> RegisterClient {
    RegisterClient::new(&ClientSettings {
        base_url: format!("{}/api", server.uri()),
        username: "poleary".into(),
        password: "secret".into(),
        timeout: Duration::from_secs(5),
        user_agent: "regsync/test".into(),
    })
    .unwrap()
}

fn project() -> ProjectId {
    "1879048422".parse().unwrap()
}

#[tokio::test]
async fn fetches_and_filters_schema() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/1879048422/register/schema"))
        .and(header("authorization", AUTH))
        .and(header("accept", "application/xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SCHEMA))
        .expect(1)
        .mount(&server)
        .await;

    let schema = client(&server).fetch_schema(&project()).await.unwrap();
    assert_eq!(schema.project_name, "Breeze Tower");
    assert_eq!(schema.field_count(), 2);
}

#[tokio::test]
async fn search_sends_query_and_return_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/1879048422/register"))
        .and(query_param("search_query", "regsync-20261018-4821"))
        .and(query_param(
            "return_fields",
            "title,docno,statusid,doctype,filename,revision,discipline",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH))
        .expect(1)
        .mount(&server)
        .await;

    let hits = client(&server)
        .search(&project(), "regsync-20261018-4821")
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].document_number, "regsync-20261018-4821-a");
}

#[tokio::test]
async fn upload_posts_multipart_descriptor_and_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/projects/1879048422/register"))
        .and(header_regex(
            "content-type",
            "^multipart/mixed; boundary=regsync-boundary",
        ))
        .and(body_string_contains("<DocumentNumber>n-1</DocumentNumber>"))
        .and(body_string_contains("X-Filename: document.txt"))
        .and(body_string_contains("aGVsbG8="))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<RegisterDocument DocumentId="271341877549097300"/>"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut template = DocumentTemplate::new();
    template.set("DocumentNumber", "n-1").unwrap();
    let file = DocumentFile::new("document.txt", b"hello".to_vec());

    let receipt = client(&server)
        .upload(&project(), &UploadTarget::New, &template, &file)
        .await
        .unwrap();
    assert_eq!(
        receipt.document_id.as_ref().map(DocumentId::as_str),
        Some("271341877549097300")
    );
    assert_eq!(receipt.filename, "document.txt");
}

#[tokio::test]
async fn supersede_posts_to_document_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/projects/1879048422/register/42/supersede"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let target = UploadTarget::Supersede("42".parse().unwrap());
    let file = DocumentFile::new("editedDocument.txt", b"v2".to_vec());
    let receipt = client(&server)
        .upload(&project(), &target, &DocumentTemplate::new(), &file)
        .await
        .unwrap();
    assert_eq!(receipt.document_id, None);
}

#[tokio::test]
async fn download_uses_content_disposition_filename() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/1879048422/register/42"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-disposition", "attachment; filename=\"blank.pdf\"")
                .set_body_bytes(b"%PDF-1.4".to_vec()),
        )
        .mount(&server)
        .await;

    let file = client(&server)
        .download(&project(), &"42".parse().unwrap())
        .await
        .unwrap();
    assert_eq!(file.filename, "blank.pdf");
    assert_eq!(file.bytes, b"%PDF-1.4");
}

#[tokio::test]
async fn download_missing_document_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/1879048422/register/42"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server)
        .download(&project(), &"42".parse().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, RegisterError::NotFound { .. }));
}

#[tokio::test]
async fn server_errors_surface_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("register offline"))
        .mount(&server)
        .await;

    let err = client(&server).fetch_schema(&project()).await.unwrap_err();
    match err {
        RegisterError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "register offline");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn rate_limit_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "5"))
        .mount(&server)
        .await;

    let err = client(&server).search(&project(), "x").await.unwrap_err();
    assert!(matches!(
        err,
        RegisterError::RateLimited {
            retry_after_secs: 5
        }
    ));
}

#[tokio::test]
async fn rejected_credentials_are_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client(&server).fetch_schema(&project()).await.unwrap_err();
    assert!(matches!(
        err,
        RegisterError::Unauthorized { status: 401, ref project } if project == "1879048422"
    ));
}

#[tokio::test]
async fn supersede_of_unknown_document_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/projects/1879048422/register/42/supersede"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let target = UploadTarget::Supersede("42".parse().unwrap());
    let file = DocumentFile::new("editedDocument.txt", b"v2".to_vec());
    let err = client(&server)
        .upload(&project(), &target, &DocumentTemplate::new(), &file)
        .await
        .unwrap_err();
    assert!(matches!(err, RegisterError::NotFound { ref document, .. } if document == "42"));
}

#[tokio::test]
async fn register_lists_records_with_cached_schema() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/1879048422/register/schema"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SCHEMA))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/projects/1879048422/register"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH))
        .expect(2)
        .mount(&server)
        .await;

    let register = Register::new(
        client(&server),
        RegisterSettings::immediate(RunId::generate("regsync")),
    );
    let first = register.list_documents(&project(), Some("regsync")).await.unwrap();
    let second = register.list_documents(&project(), Some("regsync")).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0].document_type_id, EnumRef::Id(101));
    assert_eq!(first[0].document_status_id, EnumRef::Unresolved);
    assert!(first[0].has_file);
}

#[tokio::test]
#[ignore] // requires network
async fn live_schema_has_business_key() {
    let env = |key: &str| std::env::var(key).unwrap_or_else(|_| panic!("{key} must be set"));
    let client = RegisterClient::new(&ClientSettings {
        base_url: std::env::var("REGSYNC_API__BASE_URL")
            .unwrap_or_else(|_| "https://ea1.aconex.com/api".into()),
        username: env("REGSYNC_API__USERNAME"),
        password: env("REGSYNC_API__PASSWORD"),
        timeout: Duration::from_secs(30),
        user_agent: "regsync/test".into(),
    })
    .unwrap();
    let project: ProjectId = env("REGSYNC_PROJECTS__SOURCE").parse().unwrap();

    let schema = client.fetch_schema(&project).await.unwrap();
    assert!(
        schema
            .single_valued
            .iter()
            .any(|f| f.identifier == "DocumentNumber")
    );
}
