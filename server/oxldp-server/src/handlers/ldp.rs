//! The LDP resource controller.
//!
//! One state machine per HTTP method, composed from the request decoder,
//! the RDF codec, the interaction-model analyzer, the calculated-triple
//! inserter, and the backend. Methods are synchronous; the async
//! [`dispatch`] handler is the thin transport adapter.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use oxldp_core::format::{parse_graph, serialize_graph, RdfFormat};
use oxldp_core::vocab::ldp as ldp_vocab;
use oxldp_core::{Graph, NamedNode, Triple};

use crate::error::{LdpError, LdpResult};
use crate::headers::{self, PREFERENCE_APPLIED};
use crate::interaction;
use crate::membership::{insert_calculated_triples, strip_derived_triples};
use crate::prefer::Preferences;
use crate::request::LdpRequest;
use crate::response::LdpResponse;
use crate::server::AppState;
use crate::slug;
use crate::store::{Membership, MembershipRelation, Resource, StoredResource};

/// Request bodies past this size are rejected outright.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Transport adapter: decode the request, run the method's state machine,
/// turn errors into their status codes.
pub async fn dispatch(State(state): State<Arc<AppState>>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes.to_vec(),
        Err(e) => {
            return LdpError::bad_request(format!("failed to read request body: {e}"))
                .into_response()
        }
    };
    let req = LdpRequest::decode(&parts.uri, &parts.headers, bytes, &state.config.ldp.base_url);
    debug!(method = %parts.method, url = %req.url, "handling LDP request");

    let result = match parts.method.as_str() {
        "GET" => get_resource(&state, &req, true),
        "HEAD" => get_resource(&state, &req, false),
        "PUT" => put_resource(&state, &req),
        "POST" => post_resource(&state, &req),
        "DELETE" => delete_resource(&state, &req),
        "OPTIONS" => options_resource(&state, &req),
        _ => Err(LdpError::method_not_allowed(headers::ALLOW_PROBE)),
    };
    match result {
        Ok(response) => response.into_response(),
        Err(error) => {
            if error.status().is_server_error() {
                warn!(url = %req.url, %error, "request failed");
            } else {
                debug!(url = %req.url, %error, "request rejected");
            }
            error.into_response()
        }
    }
}

/// GET and HEAD; the two differ only in whether the body is sent.
pub fn get_resource(
    state: &AppState,
    req: &LdpRequest,
    include_body: bool,
) -> LdpResult<LdpResponse> {
    let stored = state
        .backend
        .read(&req.url)?
        .ok_or_else(|| LdpError::not_found(&req.url))?;

    let format = RdfFormat::negotiate(req.accept.as_deref())
        .ok_or_else(|| LdpError::not_acceptable(req.accept.clone().unwrap_or_default()))?;

    let prefs = Preferences::parse(req.prefer.as_deref());
    let mut graph = stored.resource.graph.clone();
    let applied = insert_calculated_triples(&mut graph, &stored, state.backend.as_ref(), &prefs)?;

    let bytes = serialize_graph(&graph, format)?;
    let etag = headers::weak_etag(&bytes);

    if let Some(if_none_match) = req.if_none_match.as_deref() {
        if headers::etag_matches(if_none_match, &etag) {
            let response = LdpResponse::new(StatusCode::NOT_MODIFIED)
                .header(header::ETAG, &etag)
                .header(header::VARY, "Accept");
            return Ok(headers::with_common_headers(
                response,
                Some(stored.resource.model),
                &state.config,
            ));
        }
    }

    let mut response = LdpResponse::new(StatusCode::OK)
        .header(header::CONTENT_TYPE, format.media_type())
        .header(header::ETAG, &etag)
        .header(header::VARY, "Accept");
    if applied {
        response = response.header(PREFERENCE_APPLIED, "return=representation");
    }
    if include_body {
        response = response.body(bytes);
    }
    Ok(headers::with_common_headers(
        response,
        Some(stored.resource.model),
        &state.config,
    ))
}

/// PUT: update an existing RDF source, or create a resource at a known URI.
pub fn put_resource(state: &AppState, req: &LdpRequest) -> LdpResult<LdpResponse> {
    let format = writable_format(req)?;
    let body = req
        .body_utf8()
        .map_err(|e| LdpError::bad_request(format!("request body is not UTF-8: {e}")))?;
    let graph = parse_graph(body, &req.url, format)?;
    let uri = NamedNode::new(&req.url)
        .map_err(|e| LdpError::bad_request(format!("invalid request URI: {e}")))?;

    match state.backend.read(&req.url)? {
        Some(existing) => update_resource(state, req, format, graph, uri, existing),
        None => create_resource(state, req, graph, uri),
    }
}

fn update_resource(
    state: &AppState,
    req: &LdpRequest,
    format: RdfFormat,
    mut graph: Graph,
    uri: NamedNode,
    existing: StoredResource,
) -> LdpResult<LdpResponse> {
    // Containers cannot be replaced.
    if existing.resource.model.is_container() {
        return Err(LdpError::method_not_allowed(headers::ALLOW_CONTAINER));
    }

    let if_match = req
        .if_match
        .as_deref()
        .ok_or(LdpError::PreconditionRequired)?;

    // The tag to beat is the current representation's, computed in the
    // request's media type with default preferences.
    let mut current = existing.resource.graph.clone();
    insert_calculated_triples(
        &mut current,
        &existing,
        state.backend.as_ref(),
        &Preferences::default(),
    )?;
    let current_etag = headers::weak_etag(&serialize_graph(&current, format)?);
    if !headers::etag_matches(if_match, &current_etag) {
        return Err(LdpError::PreconditionFailed);
    }

    strip_derived_triples(&mut graph, &uri, &existing.membership_resource_for);
    state.backend.update(Resource {
        uri: req.url.clone(),
        graph,
        // A re-PUT never reclassifies.
        model: existing.resource.model,
        membership: existing.resource.membership.clone(),
    })?;

    Ok(headers::with_common_headers(
        LdpResponse::new(StatusCode::NO_CONTENT),
        Some(existing.resource.model),
        &state.config,
    ))
}

fn create_resource(
    state: &AppState,
    req: &LdpRequest,
    mut graph: Graph,
    uri: NamedNode,
) -> LdpResult<LdpResponse> {
    let (model, membership) = interaction::analyze(&graph, &uri, req.link.as_deref())?;

    let reverse = state.backend.reverse_membership(&req.url)?;
    strip_derived_triples(&mut graph, &uri, &reverse);

    state.backend.update(Resource {
        uri: req.url.clone(),
        graph,
        model,
        membership,
    })?;

    Ok(headers::with_common_headers(
        LdpResponse::new(StatusCode::CREATED),
        Some(model),
        &state.config,
    ))
}

/// POST: mint a member URI under a container and create the member.
pub fn post_resource(state: &AppState, req: &LdpRequest) -> LdpResult<LdpResponse> {
    let parent = state
        .backend
        .read(&req.url)?
        .ok_or_else(|| LdpError::not_found(&req.url))?;
    if !parent.resource.model.is_container() {
        return Err(LdpError::method_not_allowed(headers::ALLOW_RDF_SOURCE));
    }
    let format = writable_format(req)?;

    let new_uri = slug::allocate(state.backend.as_ref(), &req.url, req.slug.as_deref())?;

    // Past the reservation, every failure releases the URI.
    match create_member(state, req, format, &parent, &new_uri) {
        Ok(response) => Ok(response),
        Err(error) => {
            state.backend.release_uri(&new_uri);
            Err(error)
        }
    }
}

fn create_member(
    state: &AppState,
    req: &LdpRequest,
    format: RdfFormat,
    parent: &StoredResource,
    new_uri: &str,
) -> LdpResult<LdpResponse> {
    let body = req
        .body_utf8()
        .map_err(|e| LdpError::bad_request(format!("request body is not UTF-8: {e}")))?;
    let mut graph = parse_graph(body, new_uri, format)?;
    let uri = NamedNode::new(new_uri)
        .map_err(|e| LdpError::internal(format!("allocated an invalid URI {new_uri}: {e}")))?;

    let (model, membership) = interaction::analyze(&graph, &uri, req.link.as_deref())?;

    let reverse = state.backend.reverse_membership(new_uri)?;
    strip_derived_triples(&mut graph, &uri, &reverse);

    // An isMemberOf parent writes the membership triple into the member's
    // own graph; it is client data there, not a derived statement.
    if let Some(Membership {
        membership_resource,
        relation: MembershipRelation::IsMemberOf(relation),
    }) = &parent.resource.membership
    {
        graph.insert(Triple::new(
            uri.clone(),
            relation.clone(),
            membership_resource.clone(),
        ));
    }

    state.backend.update(Resource {
        uri: new_uri.to_owned(),
        graph,
        model,
        membership,
    })?;

    // Containment and forward-membership side effects come after the member
    // write, so a failed write leaks nothing; a failure here compensates by
    // removing the member again.
    if let Err(error) = apply_membership_side_effects(state, parent, &uri) {
        warn!(member = new_uri, %error, "membership side effect failed, removing member");
        let _ = state.backend.remove(new_uri);
        return Err(error);
    }

    let response = LdpResponse::new(StatusCode::CREATED).header(header::LOCATION, new_uri);
    Ok(headers::with_common_headers(
        response,
        Some(parent.resource.model),
        &state.config,
    ))
}

fn apply_membership_side_effects(
    state: &AppState,
    parent: &StoredResource,
    member: &NamedNode,
) -> LdpResult<()> {
    match &parent.resource.membership {
        Some(Membership {
            membership_resource,
            relation: MembershipRelation::HasMember(relation),
        }) => state.backend.insert_data(
            membership_resource.as_str(),
            vec![Triple::new(
                membership_resource.clone(),
                relation.clone(),
                member.clone(),
            )],
        ),
        // The isMemberOf membership triple already sits in the member's own
        // graph, but containment on the parent is a separate fact and is
        // tracked the same way as for a Basic Container.
        Some(_) => insert_containment(state, parent, member),
        None => insert_containment(state, parent, member),
    }
}

fn insert_containment(
    state: &AppState,
    parent: &StoredResource,
    member: &NamedNode,
) -> LdpResult<()> {
    let container = NamedNode::new(&parent.resource.uri).map_err(|e| {
        LdpError::store(format!("invalid container URI {}: {e}", parent.resource.uri))
    })?;
    state.backend.insert_data(
        &parent.resource.uri,
        vec![Triple::new(
            container,
            ldp_vocab::CONTAINS.into_owned(),
            member.clone(),
        )],
    )
}

/// DELETE: remove, no cascade.
pub fn delete_resource(state: &AppState, req: &LdpRequest) -> LdpResult<LdpResponse> {
    if !state.backend.remove(&req.url)? {
        return Err(LdpError::not_found(&req.url));
    }
    Ok(headers::with_common_headers(
        LdpResponse::new(StatusCode::NO_CONTENT),
        None,
        &state.config,
    ))
}

/// OPTIONS: advertise what the resource supports.
pub fn options_resource(state: &AppState, req: &LdpRequest) -> LdpResult<LdpResponse> {
    let stored = state
        .backend
        .read(&req.url)?
        .ok_or_else(|| LdpError::not_found(&req.url))?;
    Ok(headers::with_common_headers(
        LdpResponse::new(StatusCode::OK),
        Some(stored.resource.model),
        &state.config,
    ))
}

/// The request's `Content-Type`, as a format whose bodies we can parse.
fn writable_format(req: &LdpRequest) -> LdpResult<RdfFormat> {
    let content_type = req
        .content_type
        .as_deref()
        .ok_or_else(|| LdpError::unsupported_media_type("missing Content-Type"))?;
    let format = RdfFormat::from_content_type(content_type)
        .ok_or_else(|| LdpError::unsupported_media_type(content_type))?;
    if !format.supports_parsing() {
        return Err(LdpError::unsupported_media_type(content_type));
    }
    Ok(format)
}
