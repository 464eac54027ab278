//! Integration tests for style registration across render passes.
//!
//! Tests are grouped by concern:
//! 1. **Dedup**: many instances, one registry entry, one resolution
//! 2. **Scoping**: scope tokens and rewritten content
//! 3. **Re-render**: repeated passes at the same call-site are no-ops
//! 4. **Ordering**: `append_styles` follows registration order
//! 5. **Failures**: loader and transform errors surface from the barrier
//! 6. **Hydration**: a resumed container skips styles the server emitted
//! 7. **Hooks**: observers see every registration step


use std::time::Duration;

use test_utils::{
    CountingLoader, FailingLoader, counted_style, element_of, event_names, instances,
    recording_hooks,
};
use veneer_render::container::{ContainerConfig, ContainerSnapshot, ContainerState};
use veneer_render::context::{RenderContext, RenderSummary};
use veneer_render::scope::ComponentInstance;
use veneer_styles::{
    Registration, StyleError, StyleEvent, StyleRef, TransformError, derive_style_id,
    install_hooks, use_styles, use_styles_scoped, use_styles_with,
};

// ═══════════════════════════════════════════════════════════════════════════════
// DEDUP
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn shared_style_resolves_once_for_many_instances() {
    let mut container = ContainerState::default();
    let mut items = instances(&mut container, "li", 5);
    let (styles, loader) = counted_style("list.css", "li { margin: 0 }");

    let mut pass = RenderContext::new(&mut container);
    let registrations: Vec<Registration> = items
        .iter_mut()
        .map(|item| pass.render(item, |cx| use_styles(cx, &styles)).unwrap())
        .collect();
    let summary = pass.finish().await.unwrap();

    assert_eq!(summary, RenderSummary { invocations: 5, tasks: 1 });
    assert!(registrations[0].is_scheduled());
    assert!(
        registrations[1..]
            .iter()
            .all(|r| matches!(r, Registration::Deduplicated { .. }))
    );
    assert_eq!(container.style_count(), 1);
    assert_eq!(loader.calls(), 1);
}

#[tokio::test]
async fn only_first_registrant_receives_content() {
    // Components A and B register the same unscoped style at call-site 0.
    let mut container = ContainerState::default();
    let mut a = ComponentInstance::new(container.create_host("a-comp"));
    let mut b = ComponentInstance::new(container.create_host("b-comp"));
    let styles = StyleRef::inline("shared.css", "p { color: red }");

    let mut pass = RenderContext::new(&mut container);
    pass.render(&mut a, |cx| use_styles(cx, &styles)).unwrap();
    pass.render(&mut b, |cx| use_styles(cx, &styles)).unwrap();
    pass.finish().await.unwrap();

    let id = derive_style_id(&styles, 0);
    let a_styles = element_of(&container, &a).append_styles();
    assert_eq!(a_styles.len(), 1);
    assert_eq!(a_styles[0].style_id, id);
    assert_eq!(a_styles[0].content, "p { color: red }");

    let b_element = element_of(&container, &b);
    assert!(b_element.is_initialized());
    assert!(b_element.append_styles().is_empty());
    assert!(b_element.scope_ids().is_empty());
}

#[tokio::test]
async fn styles_with_same_symbol_share_identity() {
    let mut container = ContainerState::default();
    let mut items = instances(&mut container, "div", 2);
    let (first, first_loader) = counted_style("theme.css", "a{}");
    let (second, second_loader) = counted_style("theme.css", "b{}");

    let mut pass = RenderContext::new(&mut container);
    pass.render(&mut items[0], |cx| use_styles(cx, &first)).unwrap();
    pass.render(&mut items[1], |cx| use_styles(cx, &second)).unwrap();
    pass.finish().await.unwrap();

    assert_eq!(first_loader.calls(), 1);
    assert_eq!(second_loader.calls(), 0);
}

#[tokio::test]
async fn distinct_call_sites_register_independently() {
    let mut container = ContainerState::default();
    let mut component = ComponentInstance::new(container.create_host("div"));
    let (base, _) = counted_style("base.css", "base{}");
    let (extra, _) = counted_style("extra.css", "extra{}");

    let mut pass = RenderContext::new(&mut container);
    let (first, second) = pass.render(&mut component, |cx| {
        (
            use_styles(cx, &base).unwrap(),
            use_styles(cx, &extra).unwrap(),
        )
    });
    let summary = pass.finish().await.unwrap();

    assert_eq!(first.style_id(), Some(&derive_style_id(&base, 0)));
    assert_eq!(second.style_id(), Some(&derive_style_id(&extra, 1)));
    assert_eq!(summary.tasks, 2);
    assert_eq!(component.slot_count(), 2);
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCOPING
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn scoped_registration_records_token_and_rewrites() {
    let mut container = ContainerState::default();
    let mut c = ComponentInstance::new(container.create_host("c-comp"));
    let styles = StyleRef::inline("c.css", ".title, p:hover::selection { color: red }");

    let mut pass = RenderContext::new(&mut container);
    pass.render(&mut c, |cx| use_styles_scoped(cx, &styles)).unwrap();
    pass.finish().await.unwrap();

    let id = derive_style_id(&styles, 0);
    let token = container.config().scope_token(&id);
    let element = element_of(&container, &c);

    assert_eq!(element.scope_ids(), vec![token.clone()]);
    let appended = element.append_styles();
    assert_eq!(appended[0].style_id, id);
    assert_eq!(
        appended[0].content,
        format!(".title.{token},p:hover.{token}::selection{{color:red}}")
    );
}

#[tokio::test]
async fn every_scoped_instance_gets_the_token() {
    let mut container = ContainerState::default();
    let mut cards = instances(&mut container, "card", 3);
    let (styles, loader) = counted_style("card.css", ".card { padding: 1px }");

    let mut pass = RenderContext::new(&mut container);
    for card in &mut cards {
        pass.render(card, |cx| use_styles_scoped(cx, &styles)).unwrap();
    }
    pass.finish().await.unwrap();

    let token = container.config().scope_token(&derive_style_id(&styles, 0));
    for card in &cards {
        assert_eq!(element_of(&container, card).scope_ids(), vec![token.clone()]);
    }
    assert_eq!(element_of(&container, &cards[0]).append_styles().len(), 1);
    assert!(element_of(&container, &cards[1]).append_styles().is_empty());
    assert_eq!(loader.calls(), 1);
}

#[tokio::test]
async fn scope_prefix_comes_from_container_config() {
    let mut container = ContainerState::new(ContainerConfig::new().with_scope_prefix("v-"));
    let mut component = ComponentInstance::new(container.create_host("div"));
    let styles = StyleRef::inline("x.css", "a{color:red}");

    let mut pass = RenderContext::new(&mut container);
    pass.render(&mut component, |cx| use_styles_scoped(cx, &styles))
        .unwrap();
    pass.finish().await.unwrap();

    let id = derive_style_id(&styles, 0);
    let element = element_of(&container, &component);
    assert_eq!(element.scope_ids(), vec![format!("v-{id}")]);
    assert_eq!(element.append_styles()[0].content, format!("a.v-{id}{{color:red}}"));
}

#[tokio::test]
async fn each_scoped_call_adds_its_own_token() {
    let mut container = ContainerState::default();
    let mut component = ComponentInstance::new(container.create_host("div"));
    let layout = StyleRef::inline("layout.css", ".row { display: flex }");
    let theme = StyleRef::inline("theme.css", ".row { color: red }");

    let mut pass = RenderContext::new(&mut container);
    pass.render(&mut component, |cx| {
        use_styles_scoped(cx, &layout).unwrap();
        use_styles_scoped(cx, &theme).unwrap();
    });
    pass.finish().await.unwrap();

    let config = container.config();
    let layout_token = config.scope_token(&derive_style_id(&layout, 0));
    let theme_token = config.scope_token(&derive_style_id(&theme, 1));
    let element = element_of(&container, &component);

    assert_eq!(element.scope_ids(), vec![layout_token.clone(), theme_token.clone()]);
    let contents: Vec<String> = element
        .append_styles()
        .into_iter()
        .map(|style| style.content)
        .collect();
    assert_eq!(
        contents,
        vec![
            format!(".row.{layout_token}{{display:flex}}"),
            format!(".row.{theme_token}{{color:red}}"),
        ]
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// RE-RENDER
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn rerender_has_no_side_effects() {
    let mut container = ContainerState::default();
    let mut d = ComponentInstance::new(container.create_host("d-comp"));
    let (styles, loader) = counted_style("d.css", "d { x: y }");

    let mut first = RenderContext::new(&mut container);
    let registration = first.render(&mut d, |cx| use_styles_scoped(cx, &styles)).unwrap();
    assert!(registration.is_scheduled());
    first.finish().await.unwrap();

    let element = element_of(&container, &d);
    let scope_before = element.scope_ids();
    let append_before = element.append_styles();

    let mut second = RenderContext::new(&mut container);
    let registration = second.render(&mut d, |cx| use_styles_scoped(cx, &styles)).unwrap();
    assert_eq!(registration, Registration::Skipped);
    let summary = second.finish().await.unwrap();

    assert_eq!(summary, RenderSummary { invocations: 1, tasks: 0 });
    assert_eq!(element.scope_ids(), scope_before);
    assert_eq!(element.append_styles(), append_before);
    assert_eq!(container.style_count(), 1);
    assert_eq!(loader.calls(), 1);
    assert_eq!(d.render_count(), 2);
}

#[tokio::test]
async fn new_instance_after_rerender_is_deduplicated() {
    let mut container = ContainerState::default();
    let mut first = ComponentInstance::new(container.create_host("div"));
    let (styles, loader) = counted_style("late.css", "p{}");

    let mut pass = RenderContext::new(&mut container);
    pass.render(&mut first, |cx| use_styles(cx, &styles)).unwrap();
    pass.finish().await.unwrap();

    let mut late = ComponentInstance::new(container.create_host("div"));
    let mut pass = RenderContext::new(&mut container);
    let registration = pass.render(&mut late, |cx| use_styles(cx, &styles)).unwrap();
    pass.finish().await.unwrap();

    assert!(matches!(registration, Registration::Deduplicated { .. }));
    assert_eq!(loader.calls(), 1);
}

// ═══════════════════════════════════════════════════════════════════════════════
// ORDERING
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test(start_paused = true)]
async fn append_order_follows_registration_not_completion() {
    let mut container = ContainerState::default();
    let mut component = ComponentInstance::new(container.create_host("div"));
    let slow = StyleRef::lazy(
        "slow.css",
        CountingLoader::new("slow{}").with_delay(Duration::from_millis(50)),
    );
    let fast = StyleRef::lazy("fast.css", CountingLoader::new("fast{}"));

    let mut pass = RenderContext::new(&mut container);
    pass.render(&mut component, |cx| {
        use_styles(cx, &slow).unwrap();
        use_styles(cx, &fast).unwrap();
    });
    pass.finish().await.unwrap();

    let contents: Vec<String> = element_of(&container, &component)
        .append_styles()
        .into_iter()
        .map(|style| style.content)
        .collect();
    assert_eq!(contents, vec!["slow{}", "fast{}"]);
}

#[tokio::test]
async fn content_is_not_visible_before_finish() {
    let mut container = ContainerState::default();
    let host = container.create_host("div");
    let mut component = ComponentInstance::new(host.clone());
    let styles = StyleRef::inline("early.css", "p{}");

    let mut pass = RenderContext::new(&mut container);
    pass.render(&mut component, |cx| use_styles(cx, &styles)).unwrap();

    let element = pass.container().find_element_context(host.id()).unwrap();
    assert!(element.append_styles().is_empty());
    assert_eq!(element.pending_appends(), vec![derive_style_id(&styles, 0)]);

    pass.finish().await.unwrap();
    assert_eq!(element.append_styles().len(), 1);
    assert!(element.pending_appends().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════════
// FAILURES
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn loader_failure_surfaces_from_finish() {
    let mut container = ContainerState::default();
    let mut component = ComponentInstance::new(container.create_host("div"));
    let broken = StyleRef::lazy("broken.css", FailingLoader("offline"));
    let (fine, fine_loader) = counted_style("fine.css", "ok{}");

    let mut pass = RenderContext::new(&mut container);
    pass.render(&mut component, |cx| {
        use_styles(cx, &broken).unwrap();
        use_styles(cx, &fine).unwrap();
    });
    let err = pass.finish().await.unwrap_err();

    assert_eq!(err.total, 2);
    assert_eq!(err.failures.len(), 1);
    match err.first_as::<StyleError>() {
        Some(StyleError::Resolution { style_id, source }) => {
            assert_eq!(style_id, &derive_style_id(&broken, 0));
            assert_eq!(source.to_string(), "offline");
        }
        other => panic!("unexpected failure: {other:?}"),
    }

    // The sibling still resolved; the failed slot never reports content.
    assert_eq!(fine_loader.calls(), 1);
    let element = element_of(&container, &component);
    let appended = element.append_styles();
    assert_eq!(appended.len(), 1);
    assert_eq!(appended[0].content, "ok{}");
    assert_eq!(element.pending_appends(), vec![derive_style_id(&broken, 0)]);

    // The identity stays registered: no retry on the next pass.
    assert!(container.has_style(&derive_style_id(&broken, 0)));
}

#[tokio::test]
async fn malformed_css_is_a_transform_error() {
    let mut container = ContainerState::default();
    let mut component = ComponentInstance::new(container.create_host("div"));
    let styles = StyleRef::inline("bad.css", "a { color: red }\n.a..b { color: red }");

    let mut pass = RenderContext::new(&mut container);
    pass.render(&mut component, |cx| use_styles_scoped(cx, &styles))
        .unwrap();
    let err = pass.finish().await.unwrap_err();

    assert!(matches!(
        err.first_as::<StyleError>(),
        Some(StyleError::Transform {
            source: TransformError::Parse { line: 2, .. },
            ..
        })
    ));
}

#[tokio::test]
async fn custom_transform_errors_propagate() {
    let mut container = ContainerState::default();
    let mut component = ComponentInstance::new(container.create_host("div"));
    let styles = StyleRef::inline("x.css", "x{}");
    let reject = |_: &str, _: &veneer_render::style::StyleId| {
        Err::<String, _>(TransformError::Rejected("no".into()))
    };

    let mut pass = RenderContext::new(&mut container);
    pass.render(&mut component, |cx| {
        use_styles_with(cx, &styles, reject, false)
    })
    .unwrap();
    let err = pass.finish().await.unwrap_err();

    let style_err = err.first_as::<StyleError>().unwrap();
    assert_eq!(style_err.style_id(), Some(&derive_style_id(&styles, 0)));
}

// ═══════════════════════════════════════════════════════════════════════════════
// HYDRATION
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn resumed_container_skips_server_styles() {
    // Server pass.
    let mut server = ContainerState::default();
    let mut server_comp = ComponentInstance::new(server.create_host("app"));
    let (styles, server_loader) = counted_style("app.css", "app{}");

    let mut pass = RenderContext::new(&mut server);
    pass.render(&mut server_comp, |cx| use_styles_scoped(cx, &styles))
        .unwrap();
    pass.finish().await.unwrap();
    assert_eq!(server_loader.calls(), 1);

    let json = serde_json::to_string(&server.snapshot()).unwrap();

    // Client pass, resumed from the serialized registry.
    let snapshot: ContainerSnapshot = serde_json::from_str(&json).unwrap();
    let mut client = ContainerState::resume(ContainerConfig::default(), snapshot);
    let mut client_comp = ComponentInstance::new(client.create_host("app"));
    let (client_styles, client_loader) = counted_style("app.css", "app{}");

    let mut pass = RenderContext::new(&mut client);
    let registration = pass
        .render(&mut client_comp, |cx| use_styles_scoped(cx, &client_styles))
        .unwrap();
    let summary = pass.finish().await.unwrap();

    assert!(matches!(registration, Registration::Deduplicated { .. }));
    assert_eq!(summary.tasks, 0);
    assert_eq!(client_loader.calls(), 0);

    // The component still carries its scope class.
    let token = client.config().scope_token(&derive_style_id(&client_styles, 0));
    assert_eq!(element_of(&client, &client_comp).scope_ids(), vec![token]);
}

// ═══════════════════════════════════════════════════════════════════════════════
// HOOKS
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn hooks_observe_registration_lifecycle() {
    let mut container = ContainerState::default();
    let (hooks, log) = recording_hooks();
    assert!(install_hooks(&mut container, hooks).is_none());

    let mut items = instances(&mut container, "div", 2);
    let styles = StyleRef::inline("h.css", "h{}");
    let broken = StyleRef::lazy("broken.css", FailingLoader("nope"));

    let mut pass = RenderContext::new(&mut container);
    pass.render(&mut items[0], |cx| {
        use_styles(cx, &styles).unwrap();
        use_styles(cx, &broken).unwrap();
    });
    pass.render(&mut items[1], |cx| {
        use_styles(cx, &styles).unwrap();
    });
    assert_eq!(event_names(&log), vec!["registered", "registered", "deduplicated"]);

    pass.finish().await.unwrap_err();
    let names = event_names(&log);
    assert_eq!(names.len(), 5);
    assert!(names[3..].contains(&"resolved"));
    assert!(names[3..].contains(&"failed"));

    let events = log.lock();
    let failed = events
        .iter()
        .find(|event| matches!(event, StyleEvent::Failed { .. }))
        .unwrap();
    assert_eq!(failed.style_id(), &derive_style_id(&broken, 1));
    assert_eq!(failed.host(), items[0].host());
}

#[tokio::test]
async fn skipped_calls_emit_nothing() {
    let mut container = ContainerState::default();
    let (hooks, log) = recording_hooks();
    install_hooks(&mut container, hooks);
    let mut component = ComponentInstance::new(container.create_host("div"));
    let styles = StyleRef::inline("s.css", "s{}");

    for _ in 0..3 {
        let mut pass = RenderContext::new(&mut container);
        pass.render(&mut component, |cx| use_styles(cx, &styles)).unwrap();
        pass.finish().await.unwrap();
    }

    assert_eq!(event_names(&log), vec!["registered", "resolved"]);
}

// ═══════════════════════════════════════════════════════════════════════════════
// FILE LOADER
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn file_styles_resolve_from_disk() {
    let path = std::env::temp_dir().join(format!("veneer-styles-{}.css", std::process::id()));
    tokio::fs::write(&path, "main { display: grid }").await.unwrap();

    let mut container = ContainerState::default();
    let mut component = ComponentInstance::new(container.create_host("main"));
    let styles = StyleRef::file(&path);

    let mut pass = RenderContext::new(&mut container);
    pass.render(&mut component, |cx| use_styles(cx, &styles)).unwrap();
    pass.finish().await.unwrap();
    tokio::fs::remove_file(&path).await.unwrap();

    assert_eq!(
        element_of(&container, &component).append_styles()[0].content,
        "main { display: grid }"
    );
}
