//! Protocol-level tests: the controller driven directly over the in-memory
//! backend, no listener in the way.

use std::sync::Arc;

use axum::http::StatusCode;

use oxldp_core::vocab::ldp as ldp_vocab;
use oxldp_server::error::LdpError;
use oxldp_server::handlers::ldp;
use oxldp_server::headers::{ALLOW_CONTAINER, ALLOW_RDF_SOURCE};
use oxldp_server::request::LdpRequest;
use oxldp_server::response::LdpResponse;
use oxldp_server::{AppState, LdpResult, MemoryStore, ServerConfig};

const TURTLE: &str = "text/turtle";
const PREFER_CONTAINMENT: &str =
    r#"return=representation; include="http://www.w3.org/ns/ldp#PreferContainment""#;
const PREFER_OMIT_MEMBERSHIP: &str =
    r#"return=representation; omit="http://www.w3.org/ns/ldp#PreferMembership""#;

fn state() -> Arc<AppState> {
    let mut config = ServerConfig::default();
    config.ldp.base_url = "http://h".to_owned();
    config.ldp.context_path = "/r".to_owned();
    AppState::new(Arc::new(MemoryStore::new()), config).unwrap()
}

fn request(url: &str) -> LdpRequest {
    LdpRequest {
        url: url.to_owned(),
        ..LdpRequest::default()
    }
}

fn turtle_request(url: &str, body: &str) -> LdpRequest {
    LdpRequest {
        url: url.to_owned(),
        body: body.as_bytes().to_vec(),
        content_type: Some(TURTLE.to_owned()),
        ..LdpRequest::default()
    }
}

fn put(state: &AppState, url: &str, body: &str) -> LdpResult<LdpResponse> {
    ldp::put_resource(state, &turtle_request(url, body))
}

fn post(state: &AppState, url: &str, body: &str, slug: Option<&str>) -> LdpResult<LdpResponse> {
    let mut req = turtle_request(url, body);
    req.slug = slug.map(str::to_owned);
    ldp::post_resource(state, &req)
}

fn get(state: &AppState, url: &str) -> LdpResult<LdpResponse> {
    ldp::get_resource(state, &request(url), true)
}

fn get_with_prefer(state: &AppState, url: &str, prefer: &str) -> LdpResult<LdpResponse> {
    let mut req = request(url);
    req.prefer = Some(prefer.to_owned());
    ldp::get_resource(state, &req, true)
}

#[test]
fn root_container_answers_get() {
    let state = state();
    let response = get(&state, "http://h/r/").unwrap();
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header_value("content-type"), Some(TURTLE));
    assert_eq!(response.header_value("allow"), Some(ALLOW_CONTAINER));
    assert!(response.body_utf8().contains("ldp:BasicContainer"));
}

#[test]
fn scenario_basic_container_and_member() {
    let state = state();

    let created = put(
        &state,
        "http://h/r/c1",
        "<> a <http://www.w3.org/ns/ldp#BasicContainer> .",
    )
    .unwrap();
    assert_eq!(created.status, StatusCode::CREATED);

    let member = post(
        &state,
        "http://h/r/c1",
        r#"<> <http://purl.org/dc/terms/title> "x" ."#,
        Some("a"),
    )
    .unwrap();
    assert_eq!(member.status, StatusCode::CREATED);
    assert_eq!(member.header_value("location"), Some("http://h/r/c1/a"));

    let listing = get_with_prefer(&state, "http://h/r/c1", PREFER_CONTAINMENT).unwrap();
    assert_eq!(listing.status, StatusCode::OK);
    assert_eq!(
        listing.header_value("preference-applied"),
        Some("return=representation")
    );
    assert!(listing
        .body_utf8()
        .contains("<http://h/r/c1> ldp:contains <http://h/r/c1/a> ."));

    // Without the explicit preference, containment is still there but no
    // Preference-Applied is claimed.
    let plain = get(&state, "http://h/r/c1").unwrap();
    assert!(plain.body_utf8().contains("ldp:contains"));
    assert!(plain.header_value("preference-applied").is_none());

    // The container advertises its model and what POST accepts.
    let links = plain.header_values("link").join("\n");
    assert!(links.contains("ldp#BasicContainer>; rel=\"type\""));
    assert!(links.contains("ldp#Resource>; rel=\"type\""));
    assert!(links.contains("constraints.html"));
    assert!(plain.header_value("accept-post").is_some());
}

#[test]
fn scenario_etag_round_trip() {
    let state = state();
    put(
        &state,
        "http://h/r/c1",
        "<> a <http://www.w3.org/ns/ldp#BasicContainer> .",
    )
    .unwrap();
    post(
        &state,
        "http://h/r/c1",
        r#"<> <http://purl.org/dc/terms/title> "x" ."#,
        Some("a"),
    )
    .unwrap();

    let first = get(&state, "http://h/r/c1/a").unwrap();
    assert_eq!(first.status, StatusCode::OK);
    let etag = first.header_value("etag").unwrap().to_owned();
    assert!(etag.starts_with("W/\""));
    assert_eq!(first.header_value("vary"), Some("Accept"));

    // Conditional GET hits.
    let mut conditional = request("http://h/r/c1/a");
    conditional.if_none_match = Some(etag.clone());
    let not_modified = ldp::get_resource(&state, &conditional, true).unwrap();
    assert_eq!(not_modified.status, StatusCode::NOT_MODIFIED);
    assert!(not_modified.body.is_empty());

    // Update with a bogus tag is refused.
    let mut update = turtle_request(
        "http://h/r/c1/a",
        r#"<> <http://purl.org/dc/terms/title> "y" ."#,
    );
    update.if_match = Some("\"bogus\"".to_owned());
    let err = ldp::put_resource(&state, &update).unwrap_err();
    assert_eq!(err.status(), StatusCode::PRECONDITION_FAILED);

    // Update with the right tag succeeds.
    let mut update = turtle_request(
        "http://h/r/c1/a",
        r#"<> <http://purl.org/dc/terms/title> "y" ."#,
    );
    update.if_match = Some(etag.clone());
    let updated = ldp::put_resource(&state, &update).unwrap();
    assert_eq!(updated.status, StatusCode::NO_CONTENT);

    // The representation, and with it the tag, changed.
    let second = get(&state, "http://h/r/c1/a").unwrap();
    let new_etag = second.header_value("etag").unwrap().to_owned();
    assert_ne!(new_etag, etag);
    assert!(second.body_utf8().contains("\"y\""));

    let mut conditional = request("http://h/r/c1/a");
    conditional.if_none_match = Some(new_etag);
    assert_eq!(
        ldp::get_resource(&state, &conditional, true).unwrap().status,
        StatusCode::NOT_MODIFIED
    );
}

#[test]
fn update_without_if_match_is_precondition_required() {
    let state = state();
    put(&state, "http://h/r/x", r#"<> <http://e/p> "v" ."#).unwrap();

    let err = put(&state, "http://h/r/x", r#"<> <http://e/p> "w" ."#).unwrap_err();
    assert_eq!(err.status(), StatusCode::PRECONDITION_REQUIRED);
}

#[test]
fn scenario_direct_container_membership() {
    let state = state();

    put(
        &state,
        "http://h/r/c2",
        r#"<> a <http://www.w3.org/ns/ldp#DirectContainer> ;
             <http://www.w3.org/ns/ldp#membershipResource> <http://h/r/mr> ;
             <http://www.w3.org/ns/ldp#hasMemberRelation> <http://ex/has> ."#,
    )
    .unwrap();
    put(
        &state,
        "http://h/r/mr",
        "<> a <http://www.w3.org/ns/ldp#RDFSource> .",
    )
    .unwrap();

    let created = post(
        &state,
        "http://h/r/c2",
        r#"<> <http://purl.org/dc/terms/title> "member" ."#,
        None,
    )
    .unwrap();
    let location = created.header_value("location").unwrap().to_owned();
    assert!(location.starts_with("http://h/r/c2/"));

    // The membership resource carries the derived membership triple...
    let mr = get(&state, "http://h/r/mr").unwrap();
    let expected = format!("<http://h/r/mr> <http://ex/has> <{location}> .");
    assert!(mr.body_utf8().contains(&expected));
    assert!(mr.header_value("preference-applied").is_none());

    // ...unless the client asks it omitted.
    let omitted = get_with_prefer(&state, "http://h/r/mr", PREFER_OMIT_MEMBERSHIP).unwrap();
    assert!(!omitted.body_utf8().contains(&expected));
    assert_eq!(
        omitted.header_value("preference-applied"),
        Some("return=representation")
    );

    // The container lists the member under ldp:contains.
    let listing = get(&state, "http://h/r/c2").unwrap();
    assert!(listing
        .body_utf8()
        .contains(&format!("ldp:contains <{location}> .")));
}

#[test]
fn scenario_is_member_of_writes_into_member_graph() {
    let state = state();
    put(
        &state,
        "http://h/r/c4",
        r#"<> a <http://www.w3.org/ns/ldp#DirectContainer> ;
             <http://www.w3.org/ns/ldp#membershipResource> <http://h/r/mr2> ;
             <http://www.w3.org/ns/ldp#isMemberOfRelation> <http://ex/of> ."#,
    )
    .unwrap();

    let created = post(&state, "http://h/r/c4", "", Some("m")).unwrap();
    assert_eq!(created.status, StatusCode::CREATED);
    let location = created.header_value("location").unwrap().to_owned();

    let member = get(&state, &location).unwrap();
    assert!(member
        .body_utf8()
        .contains(&format!("<{location}> <http://ex/of> <http://h/r/mr2> .")));

    // Containment on the container is tracked separately from the
    // membership triple in the member's graph.
    let listing = get(&state, "http://h/r/c4").unwrap();
    assert!(listing
        .body_utf8()
        .contains(&format!("<http://h/r/c4> ldp:contains <{location}> .")));
}

#[test]
fn put_create_under_a_container_path_adds_no_containment() {
    let state = state();
    put(
        &state,
        "http://h/r/c1",
        "<> a <http://www.w3.org/ns/ldp#BasicContainer> .",
    )
    .unwrap();

    // Created directly at a nested URI, not POSTed to the container.
    put(
        &state,
        "http://h/r/c1/manual",
        r#"<> <http://purl.org/dc/terms/title> "manual" ."#,
    )
    .unwrap();
    assert_eq!(
        get(&state, "http://h/r/c1/manual").unwrap().status,
        StatusCode::OK
    );

    let listing = get_with_prefer(&state, "http://h/r/c1", PREFER_CONTAINMENT).unwrap();
    assert!(!listing.body_utf8().contains("ldp:contains"));
}

#[test]
fn scenario_invalid_membership_pattern_is_conflict() {
    let state = state();
    let err = put(
        &state,
        "http://h/r/c3",
        r#"<> a <http://www.w3.org/ns/ldp#DirectContainer> ;
             <http://www.w3.org/ns/ldp#membershipResource> <http://h/r/mr> ;
             <http://www.w3.org/ns/ldp#hasMemberRelation> <http://ex/has> ;
             <http://www.w3.org/ns/ldp#isMemberOfRelation> <http://ex/of> ."#,
    )
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);
    assert!(get(&state, "http://h/r/c3").is_err());
}

#[test]
fn scenario_wrong_media_type() {
    let state = state();
    let mut req = turtle_request("http://h/r/x", "whatever");
    req.content_type = Some("text/plain".to_owned());
    let err = ldp::put_resource(&state, &req).unwrap_err();
    assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[test]
fn rdfxml_request_bodies_are_unsupported() {
    let state = state();
    let mut req = turtle_request("http://h/r/x", "<rdf:RDF/>");
    req.content_type = Some("application/rdf+xml".to_owned());
    let err = ldp::put_resource(&state, &req).unwrap_err();
    assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[test]
fn scenario_container_replacement_forbidden() {
    let state = state();
    put(
        &state,
        "http://h/r/c1",
        "<> a <http://www.w3.org/ns/ldp#BasicContainer> .",
    )
    .unwrap();

    let mut update = turtle_request(
        "http://h/r/c1",
        "<> a <http://www.w3.org/ns/ldp#BasicContainer> .",
    );
    update.if_match = Some("*".to_owned());
    let err = ldp::put_resource(&state, &update).unwrap_err();
    match err {
        LdpError::MethodNotAllowed { allow } => assert_eq!(allow, ALLOW_CONTAINER),
        other => panic!("expected MethodNotAllowed, got {other:?}"),
    }
}

#[test]
fn post_to_plain_resource_is_method_not_allowed() {
    let state = state();
    put(&state, "http://h/r/x", r#"<> <http://e/p> "v" ."#).unwrap();

    let err = post(&state, "http://h/r/x", "", None).unwrap_err();
    match err {
        LdpError::MethodNotAllowed { allow } => assert_eq!(allow, ALLOW_RDF_SOURCE),
        other => panic!("expected MethodNotAllowed, got {other:?}"),
    }
}

#[test]
fn parse_failure_on_post_releases_the_uri() {
    let state = state();
    put(
        &state,
        "http://h/r/c1",
        "<> a <http://www.w3.org/ns/ldp#BasicContainer> .",
    )
    .unwrap();

    let err = post(&state, "http://h/r/c1", "this is not turtle", Some("z")).unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    // The slug path is free again.
    let created = post(
        &state,
        "http://h/r/c1",
        r#"<> <http://purl.org/dc/terms/title> "z" ."#,
        Some("z"),
    )
    .unwrap();
    assert_eq!(created.header_value("location"), Some("http://h/r/c1/z"));
}

#[test]
fn invalid_direct_container_on_post_is_conflict_and_releases() {
    let state = state();
    put(
        &state,
        "http://h/r/c1",
        "<> a <http://www.w3.org/ns/ldp#BasicContainer> .",
    )
    .unwrap();

    let bad = r#"<> a <http://www.w3.org/ns/ldp#DirectContainer> ;
                   <http://www.w3.org/ns/ldp#hasMemberRelation> <http://ex/has> ."#;
    let err = post(&state, "http://h/r/c1", bad, Some("dc")).unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);

    let created = post(
        &state,
        "http://h/r/c1",
        r#"<> <http://purl.org/dc/terms/title> "ok" ."#,
        Some("dc"),
    )
    .unwrap();
    assert_eq!(created.header_value("location"), Some("http://h/r/c1/dc"));
}

#[test]
fn repeated_slugs_get_distinct_uris() {
    let state = state();
    put(
        &state,
        "http://h/r/c1",
        "<> a <http://www.w3.org/ns/ldp#BasicContainer> .",
    )
    .unwrap();

    let first = post(&state, "http://h/r/c1", "", Some("a")).unwrap();
    let second = post(&state, "http://h/r/c1", "", Some("a")).unwrap();
    let first = first.header_value("location").unwrap();
    let second = second.header_value("location").unwrap();

    assert_eq!(first, "http://h/r/c1/a");
    assert_ne!(first, second);
    assert!(second.starts_with("http://h/r/c1/res"));
}

#[test]
fn link_header_forces_plain_resource_on_post() {
    let state = state();
    put(
        &state,
        "http://h/r/c1",
        "<> a <http://www.w3.org/ns/ldp#BasicContainer> .",
    )
    .unwrap();

    let mut req = turtle_request(
        "http://h/r/c1",
        "<> a <http://www.w3.org/ns/ldp#BasicContainer> .",
    );
    req.slug = Some("plain".to_owned());
    req.link = Some(r#"<http://www.w3.org/ns/ldp#Resource>; rel="type""#.to_owned());
    ldp::post_resource(&state, &req).unwrap();

    // The new resource behaves as a plain RDF source: PUT is in its Allow
    // set and POST is not accepted.
    let response = get(&state, "http://h/r/c1/plain").unwrap();
    assert_eq!(response.header_value("allow"), Some(ALLOW_RDF_SOURCE));
    assert!(post(&state, "http://h/r/c1/plain", "", None).is_err());
}

#[test]
fn derived_triples_never_reach_storage() {
    let state = state();

    put(
        &state,
        "http://h/r/c2",
        r#"<> a <http://www.w3.org/ns/ldp#DirectContainer> ;
             <http://www.w3.org/ns/ldp#membershipResource> <http://h/r/mr> ;
             <http://www.w3.org/ns/ldp#hasMemberRelation> <http://ex/has> ."#,
    )
    .unwrap();

    // A client smuggling derived triples into the membership resource.
    put(
        &state,
        "http://h/r/mr",
        r#"<> a <http://www.w3.org/ns/ldp#RDFSource> ;
             <http://ex/has> <http://h/r/smuggled> ;
             <http://www.w3.org/ns/ldp#contains> <http://h/r/also-smuggled> ."#,
    )
    .unwrap();
    post(&state, "http://h/r/c2", "", None).unwrap();

    let relation = oxldp_core::NamedNode::new("http://ex/has").unwrap();
    for uri in ["http://h/r/", "http://h/r/c2", "http://h/r/mr"] {
        let stored = state.backend.read(uri).unwrap().unwrap();
        let graph = &stored.resource.graph;
        assert!(
            graph
                .statements_matching(None, Some(ldp_vocab::CONTAINS), None)
                .is_empty(),
            "{uri} stores containment triples"
        );
        assert!(
            graph
                .statements_matching(None, Some(relation.as_ref()), None)
                .is_empty(),
            "{uri} stores membership triples"
        );
    }
}

#[test]
fn delete_removes_and_404s_afterwards() {
    let state = state();
    put(&state, "http://h/r/x", r#"<> <http://e/p> "v" ."#).unwrap();

    let deleted = ldp::delete_resource(&state, &request("http://h/r/x")).unwrap();
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    assert_eq!(
        get(&state, "http://h/r/x").unwrap_err().status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        ldp::delete_resource(&state, &request("http://h/r/x"))
            .unwrap_err()
            .status(),
        StatusCode::NOT_FOUND
    );
}

#[test]
fn options_reports_container_capabilities() {
    let state = state();
    let response = ldp::options_resource(&state, &request("http://h/r/")).unwrap();
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header_value("allow"), Some(ALLOW_CONTAINER));
    assert!(response.header_value("accept-post").is_some());
}

#[test]
fn head_matches_get_but_for_the_body() {
    let state = state();
    let full = ldp::get_resource(&state, &request("http://h/r/"), true).unwrap();
    let head = ldp::get_resource(&state, &request("http://h/r/"), false).unwrap();

    assert_eq!(head.status, StatusCode::OK);
    assert!(head.body.is_empty());
    assert!(!full.body.is_empty());
    assert_eq!(head.header_value("etag"), full.header_value("etag"));
    assert_eq!(
        head.header_value("content-type"),
        full.header_value("content-type")
    );
}

#[test]
fn not_acceptable_accept_header_is_406() {
    let state = state();
    let mut req = request("http://h/r/");
    req.accept = Some("text/html".to_owned());
    assert_eq!(
        ldp::get_resource(&state, &req, true).unwrap_err().status(),
        StatusCode::NOT_ACCEPTABLE
    );
}

#[test]
fn json_ld_bodies_and_responses_work() {
    let state = state();

    let mut req = LdpRequest {
        url: "http://h/r/j".to_owned(),
        body: br#"{ "@id": "", "http://purl.org/dc/terms/title": "from json" }"#.to_vec(),
        content_type: Some("application/ld+json".to_owned()),
        ..LdpRequest::default()
    };
    assert_eq!(
        ldp::put_resource(&state, &req).unwrap().status,
        StatusCode::CREATED
    );

    req.body.clear();
    req.accept = Some("application/ld+json".to_owned());
    let response = ldp::get_resource(&state, &req, true).unwrap();
    assert_eq!(
        response.header_value("content-type"),
        Some("application/ld+json")
    );
    assert!(response.body_utf8().contains("from json"));
    assert!(response.body_utf8().contains("\"@id\": \"http://h/r/j\""));
}

#[tokio::test]
async fn dispatch_routes_methods_and_rejects_unknown_ones() {
    use axum::body::Body;
    use axum::extract::State;
    use axum::http::Request;

    let state = state();

    let get_root = Request::builder()
        .method("GET")
        .uri("/r/")
        .body(Body::empty())
        .unwrap();
    let response = ldp::dispatch(State(state.clone()), get_root).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("vary").unwrap().to_str().unwrap(),
        "Accept"
    );

    let patch = Request::builder()
        .method("PATCH")
        .uri("/r/")
        .body(Body::empty())
        .unwrap();
    let response = ldp::dispatch(State(state), patch).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        response.headers().get("allow").unwrap().to_str().unwrap(),
        "GET,HEAD,DELETE,OPTIONS"
    );
}
