use deckmatch_core::types::{label_counts, template, Body, Label, SlideDescriptor, Template};
use deckmatch_core::{DeckManifest, Settings};
use deckmatch_sync::{
    expand::expand,
    filter::{filter, plan_deletions},
    gateway::{AffineTransform, Dimension, Element, ElementKind, Size},
    reconcile_order,
    reorder::plan_moves,
    run, MemoryDeck, Phase, ReconcileError, RunOptions, SlideGateway,
};
use rstest::rstest;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn labels(xs: &[&str]) -> Template {
    template(xs.iter().copied())
}

#[test]
fn scenario_delete_only() {
    init_logging();
    let current = labels(&["cover", "text", "closing"]);
    let target = labels(&["cover", "closing"]);
    let mut deck = MemoryDeck::from_labels(&current);
    let text_slide = deck.slide_ids()[1].clone();

    let out = reconcile_order(&mut deck, current, &target).expect("reconcile");
    assert_eq!(out.ordered, target);
    assert_eq!(deck.labels(), target);
    assert_eq!(out.deleted.len(), 1);
    assert_eq!(out.deleted[0].position, 1);
    assert_eq!(out.deleted[0].slide, text_slide);
    assert!(out.duplicated.is_empty());
    assert!(out.moves.is_empty());
    assert_eq!(deck.batches().len(), 1);
}

#[test]
fn scenario_expand_only() {
    init_logging();
    let current = labels(&["cover", "text", "closing"]);
    let target = labels(&["cover", "text", "text", "closing"]);
    let mut deck = MemoryDeck::from_labels(&current);

    let out = reconcile_order(&mut deck, current, &target).expect("reconcile");
    assert_eq!(deck.labels(), target);
    assert_eq!(out.duplicated.len(), 1);
    assert_eq!(out.duplicated[0].position, 1);
    assert_eq!(out.duplicated[0].copies, 1);
    assert!(out.moves.is_empty());
    assert_eq!(deck.count_requests("duplicateObject"), 1);
}

#[test]
fn scenario_single_move() {
    init_logging();
    let current = labels(&["cover", "text", "image", "closing"]);
    let target = labels(&["cover", "image", "text", "closing"]);
    let mut deck = MemoryDeck::from_labels(&current);

    let out = reconcile_order(&mut deck, current, &target).expect("reconcile");
    assert_eq!(deck.labels(), target);
    assert_eq!(out.moves.len(), 1);
    assert_eq!((out.moves[0].from, out.moves[0].to), (2, 1));
    assert_eq!(deck.count_requests("updateSlidesPosition"), 1);
}

#[rstest]
#[case(&["a", "b", "c"], &["c", "b", "a"])]
#[case(&["a", "b", "c", "d"], &["d", "d", "a", "a", "a"])]
#[case(&["cover", "text", "image", "video", "closing"], &["cover", "image", "text", "text", "image", "closing"])]
#[case(&["x"], &["x", "x", "x"])]
#[case(&["a", "b"], &["b"])]
fn expansion_only_guarantee(#[case] current: &[&str], #[case] target: &[&str]) {
    let current = labels(current);
    let target = labels(target);
    let mut deck = MemoryDeck::from_labels(&current);

    let out = reconcile_order(&mut deck, current, &target).expect("reconcile");
    assert_eq!(out.ordered, target);
    assert_eq!(deck.labels(), target);
    assert_eq!(deck.batches().len(), out.batch_count());
}

#[test]
fn filter_is_idempotent() {
    let current = labels(&["cover", "video", "text", "video", "closing"]);
    let target = labels(&["cover", "text", "closing"]);
    assert_eq!(plan_deletions(&current, &target), vec![1, 3]);

    let mut deck = MemoryDeck::from_labels(&current);
    let first = filter(&mut deck, current, &target).expect("filter");
    assert_eq!(first.deleted.len(), 2);

    let batches = deck.batches().len();
    let second = filter(&mut deck, first.survivors.clone(), &target).expect("filter again");
    assert!(second.deleted.is_empty());
    assert_eq!(second.survivors, first.survivors);
    assert_eq!(deck.batches().len(), batches);
}

#[test]
fn expander_leaves_single_demand_counts_alone() {
    let current = labels(&["cover", "text", "image", "closing"]);
    let target = labels(&["closing", "image", "image", "image", "text", "cover"]);
    let mut deck = MemoryDeck::from_labels(&current);

    let out = expand(&mut deck, current.clone(), &target).expect("expand");
    let before = label_counts(&current);
    let after = label_counts(&out.expanded);
    for label in ["cover", "text", "closing"] {
        let label = Label::from(label);
        assert_eq!(after[&label], before[&label]);
    }
    let image = Label::from("image");
    assert_eq!(after[&image], 3);
    assert_eq!(&out.expanded[2..5], &labels(&["image", "image", "image"])[..]);
}

#[test]
fn move_count_matches_greedy_plan() {
    let current = labels(&["e", "a", "d", "b", "c"]);
    let target = labels(&["a", "b", "c", "d", "e"]);
    let planned = plan_moves(&current, &target).expect("plan");

    let mut deck = MemoryDeck::from_labels(&current);
    let out = reconcile_order(&mut deck, current, &target).expect("reconcile");
    assert_eq!(out.moves.len(), planned.len());
    assert_eq!(deck.count_requests("updateSlidesPosition"), planned.len());
    assert!(out.moves.iter().all(|m| m.from != m.to));
}

#[test]
fn rejected_batch_aborts_in_its_phase() {
    let current = labels(&["cover", "text", "image", "closing"]);
    let target = labels(&["cover", "image", "text", "closing"]);
    let mut deck = MemoryDeck::from_labels(&current);
    deck.reject_batch(0);

    let err = reconcile_order(&mut deck, current.clone(), &target).unwrap_err();
    assert_eq!(err.phase(), Phase::Sort);
    assert!(matches!(err, ReconcileError::Remote { .. }));
    assert_eq!(deck.labels(), current, "rejected batch left the deck untouched");
}

#[test]
fn label_missing_from_current_fails_in_sort() {
    let current = labels(&["cover", "closing"]);
    let target = labels(&["cover", "chart", "closing"]);
    let mut deck = MemoryDeck::from_labels(&current);

    let err = reconcile_order(&mut deck, current, &target).unwrap_err();
    assert!(matches!(err, ReconcileError::LabelUnavailable { position: 1, .. }));
}

#[test]
fn full_run_writes_bullets_tables_and_images() {
    init_logging();
    let current = labels(&["cover", "bullets", "table", "picture"]);
    let mut deck = MemoryDeck::from_labels(&current);
    let picture = deck.slide_ids()[3].clone();
    deck.set_elements(
        3,
        vec![
            Element::text(&format!("{picture}_title"), Some("TITLE")),
            Element::text(&format!("{picture}_body"), Some("BODY")),
            Element::image(
                &format!("{picture}_image"),
                Some(Size {
                    width: Dimension::emu(3_000_000.0),
                    height: Dimension::emu(2_000_000.0),
                }),
                Some(AffineTransform {
                    scale_x: 1.0,
                    scale_y: 1.0,
                    translate_x: 100.0,
                    translate_y: 200.0,
                    unit: "EMU".into(),
                }),
            ),
        ],
    );

    let descriptor = |page: usize, layout: &str, body: Body, images: Vec<String>| SlideDescriptor {
        page,
        layout: layout.into(),
        title: format!("Title {page}"),
        body,
        image_urls: images,
        reference: None,
    };
    let manifest = DeckManifest {
        presentation_id: "memory".into(),
        current: Some(current.clone()),
        slides: vec![
            descriptor(0, "cover", Body::Description { text: "Welcome".into() }, vec![]),
            descriptor(
                1,
                "picture",
                Body::Description { text: "Look".into() },
                vec!["https://img.example/cat.png".into()],
            ),
            descriptor(
                2,
                "bullets",
                Body::Bullets {
                    subject: "Types of AI".into(),
                    points: vec!["Vision".into(), "Language".into()],
                },
                vec![],
            ),
            descriptor(
                3,
                "table",
                Body::Table {
                    rows: vec![vec!["k".into(), "v".into()], vec!["a".into(), "1".into()]],
                },
                vec![],
            ),
        ],
    };

    let report = run(&mut deck, &manifest, &RunOptions::from_settings(&Settings::default()))
        .expect("run");
    assert_eq!(report.result, manifest.target_template());
    assert_eq!(report.warnings().count(), 0);

    let picture_slide = deck.elements(1);
    assert_eq!(picture_slide[1].text, "Look\n");
    let image = picture_slide
        .iter()
        .find(|e| e.kind == ElementKind::Image)
        .expect("replacement image");
    assert_eq!(image.id.0, format!("{picture}_image_new_image"));
    assert_eq!(image.image_url.as_deref(), Some("https://img.example/cat.png"));

    let bullets = deck.elements(2);
    assert_eq!(bullets[0].text, "Title 2");
    assert_eq!(bullets[1].text, "Types of AI\n\tVision\n\tLanguage");
    assert!(bullets[1].bulleted);

    let table = deck
        .elements(3)
        .into_iter()
        .find(|e| e.kind == ElementKind::Table)
        .expect("table");
    assert_eq!(table.cells, vec![vec!["k", "v"], vec!["a", "1"]]);

    assert_eq!(deck.slide_count().expect("count"), 4);
}
