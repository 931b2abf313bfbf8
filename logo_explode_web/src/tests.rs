// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::future::TimeoutFuture;
use js_sys::Reflect;
use kurbo::Rect;
use logo_explode_core::config::EngineConfig;
use logo_explode_core::session::Phase;
use logo_explode_core::trace::{FallbackEvent, FallbackReason, LandingEvent, LandingKind, TraceSink};
use wasm_bindgen::{JsCast as _, JsValue};
use wasm_bindgen_test::*;
use web_sys::{
    CustomEvent, Document, Element, Event, HtmlElement, MouseEvent, MouseEventInit, Node,
    PopStateEvent, PopStateEventInit,
};

use super::*;
use crate::dom::ElementAttrs;
use crate::session::{Hidden, Session};
use logo_explode_core::marker::TransitionMarker;

wasm_bindgen_test_configure!(run_in_browser);

#[derive(Clone, Default)]
struct Recorded {
    navigations: Rc<RefCell<Vec<String>>>,
    fallbacks: Rc<RefCell<Vec<FallbackReason>>>,
    landings: Rc<RefCell<Vec<LandingKind>>>,
}

struct RecordingNavigator(Recorded);

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &str) {
        self.0.navigations.borrow_mut().push(url.to_owned());
    }

    fn reload(&self) {
        self.0.navigations.borrow_mut().push("<reload>".to_owned());
    }
}

struct RecordingSink(Recorded);

impl TraceSink for RecordingSink {
    fn on_fallback(&mut self, e: &FallbackEvent<'_>) {
        self.0.fallbacks.borrow_mut().push(e.reason);
    }

    fn on_landing(&mut self, e: &LandingEvent<'_>) {
        self.0.landings.borrow_mut().push(e.kind);
    }
}

struct StubPages(Result<String, TransitionError>);

impl PageSource for StubPages {
    fn fetch(&self, _url: &str) -> PageFuture {
        Box::pin(std::future::ready(self.0.clone()))
    }
}

fn instant_config() -> EngineConfig {
    EngineConfig {
        expand_duration_ms: 0,
        shrink_duration_ms: 0,
        settle_delay_ms: 0,
        ..EngineConfig::default()
    }
}

fn context(pages: Result<String, TransitionError>) -> (Rc<EngineContext>, Recorded) {
    let recorded = Recorded::default();
    let ctx = EngineContext::with_parts(
        instant_config(),
        Box::new(RecordingNavigator(recorded.clone())),
        Box::new(StubPages(pages)),
    );
    ctx.set_sink(Box::new(RecordingSink(recorded.clone())));
    (Rc::new(ctx), recorded)
}

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

/// Mounts `html` in a fresh container on the test page.
fn mount(html: &str) -> Element {
    let doc = document();
    let root = doc.create_element("div").unwrap();
    root.set_inner_html(html);
    doc.body().unwrap().append_child(&root).unwrap();
    root
}

fn overlay_count() -> u32 {
    document()
        .query_selector_all(".transition-overlay")
        .unwrap()
        .length()
}

fn opacity(el: &Element) -> String {
    el.unchecked_ref::<HtmlElement>()
        .style()
        .get_property_value("opacity")
        .unwrap()
}

fn query(root: &Element, selector: &str) -> Element {
    root.query_selector(selector).unwrap().unwrap()
}

#[wasm_bindgen_test]
fn rebinding_keeps_one_listener_per_source() {
    let root = mount(
        r#"<div id="a" data-transition-role="source" data-transition-link="/a"></div>
           <div id="b" data-transition-role="source"><a href="/b">b</a></div>
           <div data-transition-role="source">no link</div>"#,
    );
    let (ctx, recorded) = context(Err(TransitionError::Status(404)));
    assert_eq!(bind(&ctx), 2, "sources without a link are skipped");
    for _ in 0..3 {
        bind(&ctx);
    }
    assert_eq!(ctx.bound_count(), 2);

    query(&root, "#a").unchecked_ref::<HtmlElement>().click();
    assert_eq!(
        recorded.navigations.borrow().as_slice(),
        ["/a"],
        "one click, one navigation"
    );
    root.remove();
}

#[wasm_bindgen_test]
fn missing_id_navigates_without_overlay() {
    let root = mount(
        r#"<div data-transition-role="source" data-transition-id=""><a href="/plain">go</a></div>"#,
    );
    let (ctx, recorded) = context(Err(TransitionError::Status(404)));
    bind(&ctx);
    query(&root, "a").unchecked_ref::<HtmlElement>().click();

    let navigations = recorded.navigations.borrow();
    assert_eq!(navigations.len(), 1, "exactly one navigation");
    assert!(navigations[0].ends_with("/plain"), "went to the anchor's URL");
    assert_eq!(recorded.fallbacks.borrow().as_slice(), [FallbackReason::MissingId]);
    assert_eq!(overlay_count(), 0, "no overlay for plain navigation");
    assert_eq!(ctx.sessions_started(), 0);
    root.remove();
}

#[wasm_bindgen_test]
async fn failed_fetch_falls_back_to_navigation() {
    let root = mount(
        r#"<div id="src" data-transition-role="source" data-transition-id="logo"
                data-transition-link="/gone" style="width:40px;height:20px"></div>"#,
    );
    let (ctx, recorded) = context(Err(TransitionError::Status(500)));
    bind(&ctx);
    let wrapper = query(&root, "#src");
    let marker = TransitionMarker::read(&ElementAttrs(&wrapper));

    run_transition(Rc::clone(&ctx), wrapper, marker, "/gone".to_owned()).await;

    assert_eq!(recorded.navigations.borrow().as_slice(), ["/gone"]);
    assert_eq!(recorded.fallbacks.borrow().as_slice(), [FallbackReason::Fetch]);
    assert_eq!(ctx.active_transition_id().as_deref(), Some("logo"));
    assert_eq!(ctx.bound_count(), 0, "no second session while one is running");
    if let Some(overlay) = document().query_selector(".transition-overlay").unwrap() {
        overlay.remove();
    }
    root.remove();
}

#[wasm_bindgen_test]
async fn clone_lands_on_target_and_hands_back_visibility() {
    let root = mount(
        r#"<div id="src" data-transition-role="source" data-transition-id="logo"
                style="width:40px;height:20px"></div>
           <div id="dst" data-transition-role="target" data-transition-id="logo"
                style="width:80px;height:40px;margin-left:30px"></div>"#,
    );
    let (ctx, recorded) = context(Ok(String::new()));
    let source = query(&root, "#src");
    let target = query(&root, "#dst");

    let mut session = Session::new(Rc::clone(&ctx), "logo".to_owned());
    session.advance(Phase::Cloning);
    session.stage(&source, Some("rgb(0, 0, 0)")).unwrap();
    assert_eq!(overlay_count(), 1);
    assert_eq!(opacity(&source), "0", "source hidden while the clone shows");
    assert_eq!(session.rect().size(), kurbo::Size::new(40.0, 20.0));

    for phase in [Phase::Expanding, Phase::Fetching, Phase::Swapped, Phase::Shrinking] {
        session.advance(phase);
    }
    orchestrator::land(&mut session, true, 0).await;
    session.advance(Phase::Done);

    assert_eq!(session.phase(), Phase::Done);
    assert_eq!(overlay_count(), 0, "overlay removed after landing");
    assert_eq!(opacity(&target), "", "target visible again");
    assert_eq!(opacity(&source), "");
    assert_eq!(recorded.landings.borrow().as_slice(), [LandingKind::Landed]);
    let landed = session.rect();
    let expected = resolve_rect(&target);
    assert!(
        (landed.x0 - expected.x0).abs() < 0.5 && (landed.width() - expected.width()).abs() < 0.5,
        "clone ended on the target: {landed:?} vs {expected:?}"
    );
    root.remove();
}

#[wasm_bindgen_test]
async fn icon_grid_substitutes_a_visible_clone_on_plain_target() {
    let root = mount(
        r#"<div id="src" data-transition-role="source" data-transition-id="grid">
             <svg width="100" height="100" viewBox="0 0 100 100">
               <svg x="20" y="20" width="40" height="40" viewBox="0 0 10 10">
                 <rect width="10" height="10"/></svg></svg></div>
           <div id="dst" data-transition-role="target" data-transition-id="grid"
                style="width:60px;height:30px"></div>"#,
    );
    let (ctx, recorded) = context(Ok(String::new()));
    let source = dom::animatable(&query(&root, "#src"));
    let target = query(&root, "#dst");
    let mut session = Session::new(Rc::clone(&ctx), "grid".to_owned());
    session.advance(Phase::Cloning);
    session.stage(&source, None).unwrap();
    // Hidden as soon as the new page is in, before landing starts.
    session.adopt(Hidden::hide(target.clone()));
    assert_eq!(opacity(&target), "0");
    assert!(session.cropped_icon(), "nested svg is cropped to its icon");
    for phase in [Phase::Expanding, Phase::Fetching, Phase::Swapped, Phase::Shrinking] {
        session.advance(phase);
    }

    wasm_bindgen_futures::spawn_local(async move {
        orchestrator::land(&mut session, false, 300).await;
        session.advance(Phase::Done);
    });
    TimeoutFuture::new(50).await;

    let clone = document()
        .query_selector(".transition-overlay > .transition-clone")
        .unwrap()
        .expect("clone still shrinking");
    assert_eq!(clone.tag_name().to_lowercase(), "div", "clone of the plain target");
    assert_ne!(opacity(&clone), "0", "substituted clone is visible");
    assert_eq!(opacity(&target), "0", "live target hidden while the clone shows");

    TimeoutFuture::new(600).await;
    assert_eq!(overlay_count(), 0);
    assert_eq!(opacity(&target), "", "target handed back");
    assert_eq!(recorded.landings.borrow().as_slice(), [LandingKind::Substituted]);
    root.remove();
}

#[wasm_bindgen_test]
async fn missing_target_fades_out() {
    let root = mount(
        r#"<div id="src" data-transition-role="source" data-transition-id="lonely"
                style="width:40px;height:20px"></div>"#,
    );
    let (ctx, recorded) = context(Ok(String::new()));
    let source = query(&root, "#src");

    let mut session = Session::new(Rc::clone(&ctx), "lonely".to_owned());
    session.advance(Phase::Cloning);
    session.stage(&source, None).unwrap();
    for phase in [Phase::Expanding, Phase::Fetching, Phase::Swapped, Phase::Shrinking] {
        session.advance(phase);
    }
    orchestrator::land(&mut session, false, 800).await;

    assert_eq!(overlay_count(), 0, "overlay removed without a target");
    assert_eq!(recorded.landings.borrow().as_slice(), [LandingKind::Faded]);
    root.remove();
}

#[wasm_bindgen_test]
fn modified_clicks_are_left_to_the_browser() {
    let root = mount(
        r#"<div id="src" data-transition-role="source" data-transition-id="logo"
                data-transition-link="/elsewhere"></div>"#,
    );
    let (ctx, recorded) = context(Ok(String::new()));
    assert_eq!(bind(&ctx), 1);

    let init = MouseEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    init.set_ctrl_key(true);
    let click = MouseEvent::new_with_mouse_event_init_dict("click", &init).unwrap();
    let not_prevented = query(&root, "#src").dispatch_event(&click).unwrap();

    assert!(not_prevented, "default action untouched");
    assert!(recorded.navigations.borrow().is_empty());
    assert_eq!(ctx.sessions_started(), 0);
    assert_eq!(ctx.bound_count(), 1, "listeners stay bound");
    assert_eq!(overlay_count(), 0);
    root.remove();
}

/// The destination page served by [`swap_replaces_page_and_lands_on_target`].
const ABOUT_PAGE: &str = r#"<!doctype html>
<html>
  <head>
    <title>About us</title>
    <link rel="stylesheet" data-swap-test="" href="data:text/css,%23swap-dst%7Bdisplay%3Ablock%7D">
  </head>
  <body class="about-page">
    <main id="swap-main">
      <div id="swap-dst" data-transition-role="target" data-transition-id="page"
           style="width:50px;height:50px"></div>
      <script>window.logoExplodeSwapRan = (window.logoExplodeSwapRan || 0) + 1;</script>
    </main>
  </body>
</html>"#;

#[derive(Debug)]
struct AtSwap {
    id: Option<String>,
    overlays: u32,
    body_replaced: bool,
    script_ran: bool,
}

#[wasm_bindgen_test]
async fn swap_replaces_page_and_lands_on_target() {
    let window = web_sys::window().unwrap();
    let doc = document();
    let body = doc.body().unwrap();
    let history = window.history().unwrap();
    let href = window.location().href().unwrap();
    let title = doc.title();
    let class_name = body.class_name();

    // The new body replaces everything; keep the page's own nodes to put back.
    let children = body.child_nodes();
    let kept: Vec<Node> = (0..children.length()).filter_map(|i| children.get(i)).collect();

    let root = mount(
        r#"<div id="swap-src" data-transition-role="source" data-transition-id="page"
                data-transition-link="/logo-explode-about" style="width:40px;height:20px"></div>"#,
    );
    let (ctx, recorded) = context(Ok(ABOUT_PAGE.to_owned()));
    assert_eq!(bind(&ctx), 1);

    let at_swap = Rc::new(RefCell::new(None::<AtSwap>));
    let listener = {
        let at_swap = Rc::clone(&at_swap);
        EventListener::new(&doc, SWAPPED_EVENT, move |event| {
            let doc = document();
            let id = event
                .dyn_ref::<CustomEvent>()
                .and_then(|e| Reflect::get(&e.detail(), &JsValue::from_str("transitionId")).ok())
                .and_then(|v| v.as_string());
            let script_ran = Reflect::get(&web_sys::window().unwrap(), &"logoExplodeSwapRan".into())
                .ok()
                .and_then(|v| v.as_f64())
                == Some(1.0);
            *at_swap.borrow_mut() = Some(AtSwap {
                id,
                overlays: overlay_count(),
                body_replaced: doc.get_element_by_id("swap-main").is_some()
                    && doc.get_element_by_id("swap-src").is_none(),
                script_ran,
            });
            let body = doc.body().unwrap();
            for node in &kept {
                body.append_child(node).unwrap();
            }
        })
    };

    let wrapper = query(&root, "#swap-src");
    let marker = TransitionMarker::read(&ElementAttrs(&wrapper));
    run_transition(Rc::clone(&ctx), wrapper, marker, "/logo-explode-about".to_owned()).await;
    drop(listener);

    let at_swap = at_swap.borrow_mut().take().expect("swapped event fired");
    assert_eq!(at_swap.id.as_deref(), Some("page"));
    assert_eq!(at_swap.overlays, 1, "overlay survives the body replacement");
    assert!(at_swap.body_replaced, "source page replaced by the destination");
    assert!(at_swap.script_ran, "inline script ran exactly once");

    assert!(recorded.navigations.borrow().is_empty(), "no full navigation");
    assert_eq!(recorded.landings.borrow().as_slice(), [LandingKind::Landed]);
    assert_eq!(overlay_count(), 0, "overlay gone after landing");
    assert_eq!(
        history::state_id(&history.state().unwrap()).as_deref(),
        Some("page")
    );
    assert_eq!(window.location().pathname().unwrap(), "/logo-explode-about");
    assert_eq!(doc.title(), "About us");
    assert_eq!(body.class_name(), "about-page");
    let stylesheet = doc
        .head()
        .unwrap()
        .query_selector("link[data-swap-test]")
        .unwrap()
        .expect("destination stylesheet merged into head");
    let target = doc.get_element_by_id("swap-dst").unwrap();
    assert_eq!(opacity(&target), "", "target visible after landing");

    stylesheet.remove();
    if let Some(main) = doc.get_element_by_id("swap-main") {
        main.remove();
    }
    Reflect::delete_property(&window, &"logoExplodeSwapRan".into()).unwrap();
    doc.set_title(&title);
    body.set_class_name(&class_name);
    history
        .replace_state_with_url(&JsValue::NULL, "", Some(&href))
        .unwrap();
}

#[wasm_bindgen_test]
fn popstate_reloads_swapped_pages() {
    let window = web_sys::window().unwrap();
    let (ctx, recorded) = context(Ok(String::new()));
    history::bind_popstate(&ctx, &window);

    let bare = Event::new("popstate").unwrap();
    window.dispatch_event(&bare).unwrap();
    assert!(recorded.navigations.borrow().is_empty(), "untouched page stays put");

    let init = PopStateEventInit::new();
    init.set_state(&js_sys::JSON::parse(r#"{"transitionId":"logo"}"#).unwrap());
    let to_pushed = PopStateEvent::new_with_event_init_dict("popstate", &init).unwrap();
    window.dispatch_event(&to_pushed).unwrap();
    assert_eq!(recorded.navigations.borrow().as_slice(), ["<reload>"]);

    // Back to the entry the visitor started on: no state, stale markup.
    ctx.mark_swapped();
    let to_start = Event::new("popstate").unwrap();
    window.dispatch_event(&to_start).unwrap();
    assert_eq!(
        recorded.navigations.borrow().as_slice(),
        ["<reload>", "<reload>"]
    );
}

#[wasm_bindgen_test]
fn fragments_are_percent_decoded() {
    assert_eq!(swapper::decode_fragment("caf%C3%A9"), "café");
    assert_eq!(swapper::decode_fragment("team"), "team");
    assert_eq!(swapper::decode_fragment("100%"), "100%", "malformed input kept");
}

#[wasm_bindgen_test]
fn full_view_box_matches_bounding_box() {
    let root = mount(
        r#"<svg id="full" width="100" height="50" viewBox="0 0 100 50">
             <rect x="0" y="0" width="100" height="50"/></svg>
           <svg id="crop" width="100" height="100" viewBox="0 0 100 100">
             <rect x="25" y="25" width="50" height="50"/></svg>"#,
    );
    let full = query(&root, "#full");
    let bounds = full.get_bounding_client_rect();
    let rect = resolve_rect(&full);
    let expected = Rect::new(bounds.left(), bounds.top(), bounds.right(), bounds.bottom());
    assert!(
        (rect.x0 - expected.x0).abs() < 0.01 && (rect.y1 - expected.y1).abs() < 0.01,
        "uncropped vector resolves to its box: {rect:?} vs {expected:?}"
    );

    let crop = query(&root, "#crop");
    let bounds = crop.get_bounding_client_rect();
    let rect = resolve_rect(&crop);
    assert!((rect.width() - 50.0).abs() < 0.01, "half the width: {rect:?}");
    assert!((rect.x0 - (bounds.left() + 25.0)).abs() < 0.01, "offset by a quarter");
    root.remove();
}

#[wasm_bindgen_test]
fn recreated_scripts_keep_attributes_and_text() {
    let root = mount("");
    let doc = document();
    let old = doc.create_element("script").unwrap();
    old.set_attribute("type", "application/json").unwrap();
    old.set_attribute("data-kind", "config").unwrap();
    old.set_text_content(Some("{\"a\":1}"));
    root.append_child(&old).unwrap();

    let fresh = enhance::recreate_script(&doc, &old).unwrap();
    assert_ne!(fresh, old, "a new node, never the live one");
    assert_eq!(fresh.get_attribute("type").as_deref(), Some("application/json"));
    assert_eq!(fresh.get_attribute("data-kind").as_deref(), Some("config"));
    assert_eq!(fresh.text_content().as_deref(), Some("{\"a\":1}"));
    root.remove();
}

#[wasm_bindgen_test]
fn settings_global_is_coerced() {
    let window = web_sys::window().unwrap();
    let settings = js_sys::JSON::parse(r#"{"durationExpand":"250","zIndex":10,"debug":true}"#)
        .unwrap();
    Reflect::set(&window, &JsValue::from_str(SETTINGS_GLOBAL), &settings).unwrap();
    let config = load_settings(&window);
    Reflect::delete_property(&window, &JsValue::from_str(SETTINGS_GLOBAL)).unwrap();

    assert_eq!(config.expand_duration_ms, 250);
    assert_eq!(config.z_index, 10);
    assert!(config.debug);
    assert_eq!(load_settings(&window), EngineConfig::default(), "absent means defaults");
}

#[wasm_bindgen_test]
fn history_state_carries_transition_id() {
    let state = js_sys::JSON::parse(r#"{"transitionId":"logo"}"#).unwrap();
    assert_eq!(history::state_id(&state).as_deref(), Some("logo"));
    assert_eq!(history::state_id(&JsValue::NULL), None);
    let empty = js_sys::JSON::parse(r#"{"transitionId":""}"#).unwrap();
    assert_eq!(history::state_id(&empty), None);
}

#[wasm_bindgen_test]
fn hooks_are_replaced_by_name() {
    let (ctx, _) = context(Ok(String::new()));
    let noop = js_sys::Function::new_no_args("");
    assert!(!ctx.register_hook("masonry", noop.clone(), Some("masonry".into())));
    assert!(ctx.register_hook("masonry", noop, None), "second registration replaces");
    assert!(ctx.unregister_hook("masonry"));
    assert!(!ctx.unregister_hook("masonry"));
}
