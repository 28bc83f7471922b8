//! Accessor tables resolved through environment-backed views.

use std::time::Duration;

use anyhow::{Result, anyhow, ensure};
use extprops::processing::Base64Decode;
use extprops::resolver::EnvResolver;
use extprops::{Accessor, AccessorTable, ExternalizedProperties, PropsError, PropertyView, Value};
use rstest::{fixture, rstest};
use serial_test::serial;
use test_helpers::env::{self, EnvScope};

#[fixture]
fn service_env() -> EnvScope {
    env::scope_with(|lock| {
        vec![
            lock.set_var("SVC_PROFILE", "prod"),
            lock.set_var("SVC_PROD_HOSTS", "a.example|b.example"),
            lock.set_var("SVC_PROD_TOKEN", "aHVudGVyMg=="),
            lock.set_var("SVC_PROD_DEADLINE", "1m 30s"),
            lock.remove_var("SVC_PROD_RETRIES"),
        ]
    })
}

fn table() -> Result<AccessorTable> {
    Ok(AccessorTable::from_accessors([
        Accessor::of::<Vec<String>>("hosts", "${profile}.hosts").delimiter("|"),
        Accessor::of::<String>("token", "${profile}.token").processor(Base64Decode::standard()),
        Accessor::of::<Duration>("deadline", "${profile}.deadline"),
        Accessor::of::<u8>("retries", "${profile}.retries").default_value("3"),
        Accessor::of::<Option<u16>>("port", "${profile}.port"),
    ])?)
}

fn view(eager: bool) -> Result<PropertyView> {
    let props = ExternalizedProperties::builder()
        .resolver(EnvResolver::prefixed("SVC_"))
        .eager_loading(eager)
        .build()?;
    Ok(props.view(table()?)?)
}

#[rstest]
#[serial]
fn accessors_apply_their_options(#[from(service_env)] _env: EnvScope) -> Result<()> {
    let service = view(false)?;
    let hosts: Vec<String> = service.get_as("hosts")?;
    ensure!(hosts == ["a.example", "b.example"], "unexpected hosts {hosts:?}");
    let token: String = service.get_as("token")?;
    ensure!(token == "hunter2", "token should be decoded");
    let deadline: Duration = service.get_as("deadline")?;
    ensure!(deadline == Duration::from_secs(90), "unexpected deadline {deadline:?}");
    let retries: u8 = service.get_as("retries")?;
    ensure!(retries == 3, "default should apply when the property is absent");
    let port = service.get("port")?;
    ensure!(port == Value::Optional(None), "absent optional should be empty");
    Ok(())
}

#[rstest]
#[serial]
fn unknown_accessors_are_reported(#[from(service_env)] _env: EnvScope) -> Result<()> {
    let service = view(false)?;
    let err = service
        .get("nope")
        .err()
        .ok_or_else(|| anyhow!("expected an unknown accessor"))?;
    ensure!(
        matches!(&*err, PropsError::UnknownAccessor { name } if name == "nope"),
        "unexpected error {err}"
    );
    Ok(())
}

#[rstest]
#[serial]
fn eager_views_keep_values_loaded_at_creation(#[from(service_env)] _env: EnvScope) -> Result<()> {
    let service = view(true)?;
    let _changed = env::set_var("SVC_PROD_HOSTS", "c.example");
    let hosts: Vec<String> = service.get_as("hosts")?;
    ensure!(hosts == ["a.example", "b.example"], "eager value should be kept");
    service.refresh();
    let reloaded: Vec<String> = service.get_as("hosts")?;
    ensure!(reloaded == ["c.example"], "refresh should resolve again");
    Ok(())
}

#[rstest]
#[serial]
fn eager_views_aggregate_failures(#[from(service_env)] _env: EnvScope) -> Result<()> {
    let _token = env::set_var("SVC_PROD_TOKEN", "not base64!");
    let _deadline = env::set_var("SVC_PROD_DEADLINE", "soon");
    let err = view(true)
        .err()
        .ok_or_else(|| anyhow!("expected eager loading to fail"))?;
    let props_err = err
        .downcast_ref::<std::sync::Arc<PropsError>>()
        .ok_or_else(|| anyhow!("unexpected error type: {err}"))?;
    ensure!(
        matches!(&**props_err, PropsError::Aggregate(all) if all.len() == 2),
        "expected two aggregated failures, got {props_err}"
    );
    Ok(())
}
