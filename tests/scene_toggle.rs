use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;

use vitrine::{App, Event, Point, Scene, Theme, Vec2};

fn secs(s: f64) -> Duration {
    Duration::from_secs_f64(s)
}

fn fixture_root(tag: &str, frames: u32) -> PathBuf {
    let dir = PathBuf::from("target").join("scene_toggle").join(tag);
    std::fs::create_dir_all(&dir).unwrap();
    for i in 0..frames {
        // Each frame gets a distinct red level so repaints are observable.
        let px: Vec<u8> = [50 + (i as u8) * 40, 0, 0, 255].repeat(4);
        let img = image::RgbaImage::from_raw(2, 2, px).unwrap();
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        std::fs::write(dir.join(format!("{i:03}.png")), buf).unwrap();
    }
    dir
}

fn scene() -> Scene {
    serde_json::from_value(serde_json::json!({
        "viewport": { "width": 96, "height": 96 },
        "seed": 99,
        "sequence": ["000.png", "001.png", "002.png", "003.png", "004.png"],
        "passes": [
            [
                { "start_index": 0, "num_images": 5, "duration_secs": 1.0,
                  "size_px": 24.0, "top_pct": 0.0, "left_pct": 0.0, "z_index": 1 }
            ],
            [
                { "start_index": 0, "num_images": 3, "duration_secs": 0.5,
                  "size_px": 24.0, "top_pct": 60.0, "left_pct": 60.0, "z_index": 2 }
            ]
        ],
        "audio": { "source": "music.mp3" }
    }))
    .unwrap()
}

fn click(x: f64, y: f64) -> Event {
    Event::HeadingClicked {
        position: Point::new(x, y),
    }
}

#[test]
fn full_reveal_cycle_drives_theme_audio_and_mounting() {
    let root = fixture_root("cycle", 5);
    let mut app = App::new(scene(), root).unwrap();

    // HIDDEN → REVEALED at (100, 200): mounts both passes, starts audio,
    // anchors the grow animation at the click point.
    app.dispatch(click(100.0, 200.0)).unwrap();
    assert!(app.is_revealed());
    assert_eq!(app.mounted_sprite_count(), 2);
    assert!(app.audio().unwrap().is_playing());
    assert_eq!(app.reveal().disc_center(), Point::new(100.0, 200.0));
    assert_eq!(app.theme(), Theme::Light);

    // Grow completes: dark theme active, audio still looping.
    app.tick(secs(3.0));
    assert_eq!(app.theme(), Theme::Dark);
    assert!(app.audio().unwrap().is_playing());

    // REVEALED → HIDDEN: unmounts immediately, pauses and rewinds audio,
    // light theme returns at shrink completion.
    app.dispatch(click(100.0, 200.0)).unwrap();
    assert_eq!(app.mounted_sprite_count(), 0);
    assert!(!app.audio().unwrap().is_playing());
    assert_eq!(app.audio().unwrap().position(), Duration::ZERO);
    assert_eq!(app.theme(), Theme::Dark);

    app.tick(secs(1.0));
    assert_eq!(app.theme(), Theme::Light);
    assert!(!app.reveal().disc_visible());
}

#[test]
fn rapid_toggling_never_stacks_transitions() {
    let root = fixture_root("rapid", 5);
    let mut app = App::new(scene(), root).unwrap();

    for i in 0..7 {
        app.dispatch(click(f64::from(i), 0.0)).unwrap();
        app.tick(secs(0.03));
        assert!(app.reveal().active_transitions() <= 1);
    }

    // Whatever state we landed in, the surviving transition settles cleanly.
    app.tick(secs(5.0));
    assert_eq!(app.reveal().active_transitions(), 0);
    let expected = if app.is_revealed() {
        Theme::Dark
    } else {
        Theme::Light
    };
    assert_eq!(app.theme(), expected);
}

#[test]
fn sprites_repaint_as_their_drivers_advance() {
    let root = fixture_root("repaint", 5);
    let mut app = App::new(scene(), root).unwrap();
    app.dispatch(click(48.0, 48.0)).unwrap();

    // First tick paints frame 0 of the slow sprite.
    app.tick(secs(0.016));
    let probe = |app: &App| {
        let frame = app.render_frame();
        let i = 12 * 4;
        frame.data[i]
    };
    let first = probe(&app);
    assert_eq!(first, 50);

    // Half a second later the 1 s / 5-frame driver publishes index 2.
    app.tick(secs(0.5));
    let later = probe(&app);
    assert_eq!(later, 50 + 2 * 40);
}

#[test]
fn remount_restarts_frame_state_at_start_index() {
    let root = fixture_root("remount", 5);
    let mut app = App::new(scene(), root).unwrap();

    app.dispatch(click(0.0, 0.0)).unwrap();
    app.tick(secs(0.5));
    app.dispatch(click(0.0, 0.0)).unwrap();
    app.dispatch(click(0.0, 0.0)).unwrap();
    app.tick(secs(0.016));

    // The fresh sprite is back at its start index, not mid-sweep.
    let frame = app.render_frame();
    assert_eq!(frame.data[12 * 4], 50);
}

#[test]
fn scroll_moves_the_marker_but_not_the_reveal_state() {
    let root = fixture_root("scroll", 5);
    let mut app = App::new(scene(), root).unwrap();

    app.dispatch(Event::PointerMoved {
        position: Point::new(20.0, 20.0),
    })
    .unwrap();
    app.tick(secs(1.0));
    assert_eq!(app.cursor_position(), Point::new(20.0, 20.0));

    app.dispatch(Event::Scrolled {
        offset: Vec2::new(0.0, 40.0),
    })
    .unwrap();
    app.tick(secs(1.0));
    assert_eq!(app.cursor_position(), Point::new(20.0, 60.0));
    assert!(!app.is_revealed());
    assert_eq!(app.mounted_sprite_count(), 0);
}
