use std::path::Path;

use rough_steps::{
    canvas::CellCanvas, deck::Deck, position::MemoryPublisher, sequencer::Sequencer,
};

fn sample_deck() -> Deck {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("decks/shapes.json");
    Deck::load(path).unwrap()
}

#[test]
fn sample_deck_plays_to_the_end_and_back() {
    let deck = sample_deck();
    assert_eq!(deck.steps.len(), 4);

    let mut seq = Sequencer::new(
        deck.catalog(),
        CellCanvas::new(deck.width, deck.height),
        MemoryPublisher::starting_at(Some(10)),
        99,
    );
    assert_eq!(seq.resume().unwrap(), 4);
    assert!(seq.surface().to_text().contains("a rough afternoon"));
    assert_eq!(seq.catalog().label(1), Some("sun"));

    while seq.retreat().unwrap() {}
    assert!(seq.surface().is_blank());
    assert_eq!(seq.publisher().published(), &[1, 2, 3, 4, 3, 2, 1, 0]);
}
