//! End-to-end tests for the resolve → extract → group pipeline
//!
//! These exercise the full flow a deploy tool runs for one service:
//! schema + flat store + tokens in, decoded configuration files out.

use dibs_core::{
    BucketSchema, ConfigFile, ConfigResolver, Conventions, Error, FileKind, ResolveRequest,
    ValueEncoding,
};
use dibs_test_utils::{RawStore, SchemaBuilder, tokens};
use pretty_assertions::assert_eq;
use std::collections::{BTreeMap, HashMap};

/// Store for service `web` spread over every environment layer
fn web_store() -> RawStore {
    RawStore::new("web")
        // global defaults
        .entry("global", "app.properties#log.level", "INFO")
        .entry("global", "app.properties#db.url", "jdbc://${db_host}/web")
        .entry("global", "FILES/logback.xml", "<configuration/>")
        // live environment
        .entry("live", "app.properties#log.level", "WARN")
        .entry("live_web#web", "app.properties#pool.size", "32")
        // uat environment
        .entry("uat", "app.properties#feature.beta", "true")
        .entry("uat_web", "FILES/logback.xml", "<configuration debug=\"true\"/>")
        // other services and realms are ignored
        .entry("uat#api", "app.properties#log.level", "TRACE")
        .raw("fe/apps/web/uat/app.properties#log.level", "OFF")
}

fn decoded(files: &BTreeMap<String, ConfigFile>, file: &str, key: &str) -> String {
    files[file].properties().unwrap()[key].decode().unwrap()
}

#[test]
fn test_uat_resolution_end_to_end() {
    let _ = dibs_core::logging::init();
    let schema = SchemaBuilder::new().environments("web").build();
    let store = web_store();
    let tokens = tokens(&[("db_host", "uat-db.internal")]);

    let files = ConfigResolver::default()
        .resolve(
            &ResolveRequest::new("uat_web", "web"),
            &schema,
            store.entries(),
            &tokens,
        )
        .unwrap();

    assert_eq!(
        files.keys().collect::<Vec<_>>(),
        vec!["app.properties", "logback.xml"]
    );

    assert_eq!(decoded(&files, "app.properties", "log.level"), "WARN");
    assert_eq!(decoded(&files, "app.properties", "feature.beta"), "true");
    assert_eq!(decoded(&files, "app.properties", "pool.size"), "32");
    assert_eq!(
        decoded(&files, "app.properties", "db.url"),
        "jdbc://uat-db.internal/web"
    );

    let logback = files["logback.xml"].contents().unwrap();
    assert_eq!(logback.bucket, "uat_web");
    assert_eq!(
        logback.decode().unwrap(),
        "<configuration debug=\"true\"/>"
    );

    let props = files["app.properties"].properties().unwrap();
    assert_eq!(props["log.level"].bucket, "live");
    assert_eq!(props["pool.size"].bucket, "live_web#web");
}

#[test]
fn test_live_resolution_never_sees_uat_values() {
    let schema = SchemaBuilder::new().environments("web").build();

    let files = ConfigResolver::default()
        .resolve(
            &ResolveRequest::new("live_web", "web"),
            &schema,
            web_store().entries(),
            &HashMap::new(),
        )
        .unwrap();

    let props = files["app.properties"].properties().unwrap();
    assert!(!props.contains_key("feature.beta"));
    assert_eq!(
        decoded(&files, "app.properties", "db.url"),
        "jdbc://${db_host}/web"
    );
    assert_eq!(files["logback.xml"].contents().unwrap().bucket, "global");
}

#[test]
fn test_local_overrides_are_applied_last() {
    let schema = SchemaBuilder::new().environments("web").build();
    let store = web_store().entry("local", "app.properties#log.level", "DEBUG");
    let resolver = ConfigResolver::default();

    let remote = resolver
        .resolve(
            &ResolveRequest::new("uat_web", "web"),
            &schema,
            store.entries(),
            &HashMap::new(),
        )
        .unwrap();
    let local = resolver
        .resolve(
            &ResolveRequest::new("uat_web", "web").local(),
            &schema,
            store.entries(),
            &HashMap::new(),
        )
        .unwrap();

    assert_eq!(decoded(&remote, "app.properties", "log.level"), "WARN");
    assert_eq!(decoded(&local, "app.properties", "log.level"), "DEBUG");
}

#[test]
fn test_stages_can_be_run_separately() {
    let schema = SchemaBuilder::new().environments("web").build();
    let resolver = ConfigResolver::default();
    let request = ResolveRequest::new("uat_web", "web");
    let store = web_store();

    let chain = resolver.resolve_chain(&request, &schema).unwrap();
    let resolved = resolver
        .extract(&chain, store.entries(), &HashMap::new())
        .unwrap();
    let files = resolver.group(&resolved).unwrap();

    assert_eq!(chain.selectors().first().unwrap().as_str(), "uat_web#web");
    assert_eq!(resolved["FILES/logback.xml"].bucket, "uat_web");
    assert_eq!(files["logback.xml"].kind(), FileKind::File);

    let composed = resolver
        .resolve(&request, &schema, store.entries(), &HashMap::new())
        .unwrap();
    assert_eq!(files, composed);
}

#[test]
fn test_configured_conventions_and_json_schema() {
    let conventions = Conventions::parse(
        r#"
realm_prefix = "fe/apps"
encoding = "standard-no-pad"
"#,
    )
    .unwrap();
    let schema = BucketSchema::from_json(r#"{"live_site": {"parents": ["global"]}}"#).unwrap();
    let store = RawStore::with_realm("fe/apps", "site")
        .entry("global", "FILES/robots.txt", "Disallow: /cgi-bin/?>");

    let files = ConfigResolver::new(conventions)
        .unwrap()
        .resolve(
            &ResolveRequest::new("live_site", "site"),
            &schema,
            store.entries(),
            &HashMap::new(),
        )
        .unwrap();

    let robots = files["robots.txt"].contents().unwrap();
    assert_eq!(robots.value, "RGlzYWxsb3c6IC9jZ2ktYmluLz8+");
    assert_eq!(
        robots.decode_with(ValueEncoding::StandardNoPad).unwrap(),
        "Disallow: /cgi-bin/?>"
    );
}

#[test]
fn test_schema_error_stops_the_pipeline() {
    let schema = SchemaBuilder::new().bucket("uat_web", &["uat"]).build();

    let err = ConfigResolver::default()
        .resolve(
            &ResolveRequest::new("uat_web", "web"),
            &schema,
            web_store().entries(),
            &HashMap::new(),
        )
        .unwrap_err();

    assert!(matches!(err, Error::UnknownBucket { ref bucket } if bucket == "live_web"));
}

#[test]
fn test_output_serializes_for_deploy_agents() {
    let schema = SchemaBuilder::new().bucket("svc_bucket", &["global"]).build();
    let store = RawStore::new("svc").entry("global", "FILES/a", "v1");

    let files = ConfigResolver::default()
        .resolve(
            &ResolveRequest::new("svc_bucket", "svc"),
            &schema,
            store.entries(),
            &HashMap::new(),
        )
        .unwrap();

    assert_eq!(
        serde_json::to_string(&files).unwrap(),
        r#"{"a":{"type":"FILE","contents":{"value":"djE","bucket":"global"}}}"#
    );
}
