#![no_main]
use chanlog::fmt::{Caller, RenderContext, RequestContext, Template, render};
use chrono::Local;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let _ = Template::parse(data);

    let request = RequestContext::new().server("HOST", "{TYPE}").raw_body(data);
    let caller = Caller::new().class("{SERVER.HOST}").function("run");
    let ctx = RenderContext::new(Local::now(), "fuzz", &request)
        .message(data)
        .title(data)
        .caller(Some(&caller));
    let _ = render(data, &ctx);
});
