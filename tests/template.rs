//! Tests for placeholder rendering.

use chanlog::fmt::EOL;
use chanlog::{Caller, Level, RenderContext, RequestContext, render};
use chrono::{Local, TimeZone};
use serde_json::json;

fn at_noon() -> chrono::DateTime<Local> {
    Local
        .with_ymd_and_hms(2025, 11, 30, 12, 0, 45)
        .single()
        .unwrap()
}

#[test]
fn default_row_layout() {
    let request = RequestContext::default();
    let ctx = RenderContext::new(at_noon(), "default", &request)
        .message("Test info")
        .status(Level::Info);

    let row = render("{DATE} | {STATUS} --- {MESSAGE}", &ctx);

    assert_eq!(row, "2025-11-30 12:00:45 | INFO --- Test info");
    assert_eq!(&row[19..], " | INFO --- Test info");
}

#[test]
fn custom_date_format() {
    let request = RequestContext::default();
    let ctx = RenderContext::new(at_noon(), "t", &request).format_date("%d/%m/%Y");
    assert_eq!(render("{DATE}", &ctx), "30/11/2025");
}

#[test]
fn type_and_title() {
    let request = RequestContext::default();
    let ctx = RenderContext::new(at_noon(), "payment", &request).title(" Refund ");
    assert_eq!(render("{TYPE}:{TITLE}", &ctx), "payment:Refund");
}

#[test]
fn server_tokens_resolve_known_keys_only() {
    let request = RequestContext::new()
        .server("REMOTE_ADDR", "10.0.0.7")
        .server("host", "lower");
    let ctx = RenderContext::new(at_noon(), "t", &request);

    assert_eq!(
        render("{SERVER.REMOTE_ADDR} {SERVER.HOST} {SERVER.host}", &ctx),
        "10.0.0.7 {SERVER.HOST} lower"
    );
}

#[test]
fn server_namespace_is_case_insensitive() {
    let request = RequestContext::new().server("PORT", "8080");
    let ctx = RenderContext::new(at_noon(), "t", &request);
    assert_eq!(render("{server.PORT}", &ctx), "8080");
}

#[test]
fn backtrace_tokens_use_lowercased_keys() {
    let request = RequestContext::default();
    let caller = Caller::new().class("Checkout").function("pay").line(42);
    let ctx = RenderContext::new(at_noon(), "t", &request).caller(Some(&caller));

    assert_eq!(
        render(
            "{BACKTRACE.CLASS}::{BACKTRACE.Function}@{BACKTRACE.line} {BACKTRACE.ARGS}",
            &ctx
        ),
        "Checkout::pay@42 {BACKTRACE.ARGS}"
    );
}

#[test]
fn backtrace_without_caller_is_left_alone() {
    let request = RequestContext::default();
    let ctx = RenderContext::new(at_noon(), "t", &request);
    assert_eq!(render("\"{BACKTRACE.CLASS}\"", &ctx), "\"{BACKTRACE.CLASS}\"");
}

#[test]
fn request_and_raw_body() {
    let request = RequestContext::new()
        .params(json!({"q": "café"}))
        .raw_body("a=1&b=2");
    let ctx = RenderContext::new(at_noon(), "t", &request);

    assert_eq!(render("{REQUEST}", &ctx), "{\n  \"q\": \"café\"\n}");
    assert_eq!(render("{RAWBODY}", &ctx), "a=1&b=2");
}

#[test]
fn empty_request_renders_empty_object() {
    let request = RequestContext::default();
    let ctx = RenderContext::new(at_noon(), "t", &request);
    assert_eq!(render("{REQUEST}", &ctx), "{}");
}

#[test]
fn eol_token() {
    let request = RequestContext::default();
    let ctx = RenderContext::new(at_noon(), "t", &request);
    assert_eq!(render("a{EOL}b", &ctx), format!("a{EOL}b"));
}

#[test]
fn message_braces_are_not_expanded() {
    let request = RequestContext::new().server("KEY", "secret");
    let ctx = RenderContext::new(at_noon(), "t", &request).message("{YEAR} {SERVER.KEY}");
    assert_eq!(render("{MESSAGE}", &ctx), "{YEAR} {SERVER.KEY}");
}

#[test]
fn server_key_may_span_lines() {
    let request = RequestContext::new().server("A\nB", "joined");
    let ctx = RenderContext::new(at_noon(), "t", &request);
    assert_eq!(render("{SERVER.A\nB}", &ctx), "joined");
}

#[test]
fn unclosed_namespace_does_not_hide_fixed_tokens() {
    let request = RequestContext::new().server("x", "unused");
    let ctx = RenderContext::new(at_noon(), "t", &request);

    assert_eq!(render("{SERVER.x {YEAR} {TYPE}", &ctx), "{SERVER.x 2025 t");
    assert_eq!(render("{BACKTRACE.class {MONTH}", &ctx), "{BACKTRACE.class 11");
}
