//! Interactive terminal visualization.
//!
//! The demo engine runs on a worker thread; commands go out and channel
//! messages come back over mpsc, so all visualization state is mutated by
//! this single render loop (the serialized mutation queue the core assumes).

use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{
    prelude::*,
    widgets::{
        canvas::{Canvas as CanvasWidget, Circle, Line as CanvasLine},
        Block, Borders, Paragraph,
    },
};

use match_viz::{
    Canvas, DemoEngine, EdgeClass, Frame, Inbound, Outbound, Side, VizEngine, MARKER_DIAMETER,
};

const CANVAS_WIDTH: f32 = 1280.0;
const CANVAS_HEIGHT: f32 = 720.0;
const DEFAULT_GROUP_SIZE: u32 = 5;

fn edge_color(class: EdgeClass) -> Color {
    match class {
        EdgeClass::Preference => Color::Green,
        EdgeClass::Matching => Color::Blue,
        EdgeClass::History => Color::Cyan,
    }
}

/// Run the demo engine on a worker thread: commands in, messages out.
fn spawn_engine(commands: mpsc::Receiver<Outbound>, updates: mpsc::Sender<Inbound>) {
    thread::spawn(move || {
        let mut rng = StdRng::from_entropy();
        let mut engine = DemoEngine::new();

        while let Ok(command) = commands.recv() {
            match command {
                Outbound::Generate(n) => {
                    let population = engine.generate(n, &mut rng);
                    if updates.send(Inbound::People(population)).is_err() {
                        return;
                    }
                }
                Outbound::StableMatch => {
                    for msg in engine.run_messages() {
                        if updates.send(msg).is_err() {
                            return;
                        }
                    }
                }
            }
        }
    });
}

fn draw_frame(f: &mut ratatui::Frame, viz: &VizEngine, frame: &Frame, group_size: u32) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Canvas
            Constraint::Length(3), // Status
        ])
        .split(f.size());

    let duration = viz
        .duration()
        .map(|d| format!(" | execution time: {d}"))
        .unwrap_or_default();
    let header = Paragraph::new(format!(
        "g: generate  s: start matching  r: replay history  p/m: toggle edges  +/-: group size ({group_size})  q: quit{duration}"
    ))
    .block(Block::default().borders(Borders::ALL).title("Stable Matching"))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, chunks[0]);

    let canvas = CanvasWidget::default()
        .block(Block::default().borders(Borders::ALL))
        .x_bounds([0.0, CANVAS_WIDTH as f64])
        .y_bounds([0.0, CANVAS_HEIGHT as f64])
        .paint(|ctx| {
            // Terminal canvas y grows upward; the core's grows downward
            let flip = |y: f32| (CANVAS_HEIGHT - y) as f64;

            for edge in &frame.edges {
                ctx.draw(&CanvasLine {
                    x1: edge.from.x as f64,
                    y1: flip(edge.from.y),
                    x2: edge.to.x as f64,
                    y2: flip(edge.to.y),
                    color: edge_color(edge.class),
                });
            }

            ctx.layer();

            for marker in &frame.markers {
                ctx.draw(&Circle {
                    x: marker.pos.x as f64,
                    y: flip(marker.pos.y),
                    radius: (MARKER_DIAMETER / 2.0) as f64,
                    color: match marker.side {
                        Side::Man => Color::White,
                        Side::Woman => Color::Red,
                    },
                });
            }
        });
    f.render_widget(canvas, chunks[1]);

    let playback = viz.playback();
    let status = Paragraph::new(format!(
        "phase: {:?} | history: {}/{} | markers: {} | edges: {}",
        playback.phase(),
        playback.cursor(),
        playback.log_len(),
        frame.markers.len(),
        frame.edges.len(),
    ))
    .block(Block::default().borders(Borders::ALL).title("Playback"))
    .style(Style::default().fg(Color::Yellow));
    f.render_widget(status, chunks[2]);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (command_tx, command_rx) = mpsc::channel();
    let (update_tx, update_rx) = mpsc::channel();
    spawn_engine(command_rx, update_tx);

    let mut viz = VizEngine::new(Canvas {
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
    });
    let mut group_size = DEFAULT_GROUP_SIZE;
    let mut frame = Frame::default();
    let mut last_pass = Instant::now();

    loop {
        let interval = viz.pass_interval();
        let timeout = interval.saturating_sub(last_pass.elapsed());

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Char('g') => {
                        viz.toggles_mut().preferences = true;
                        command_tx.send(Outbound::Generate(group_size))?;
                    }
                    KeyCode::Char('s') => {
                        viz.toggles_mut().preferences = false;
                        command_tx.send(Outbound::StableMatch)?;
                    }
                    KeyCode::Char('r') => viz.replay(),
                    KeyCode::Char('p') => {
                        let prefs = viz.toggles().preferences;
                        viz.toggles_mut().preferences = !prefs;
                    }
                    KeyCode::Char('m') => {
                        let matching = viz.toggles().matching;
                        viz.toggles_mut().matching = !matching;
                    }
                    KeyCode::Char('+') => group_size += 1,
                    KeyCode::Char('-') => group_size = group_size.saturating_sub(1).max(1),
                    _ => {}
                }
            }
        }

        if last_pass.elapsed() >= viz.pass_interval() {
            // Inbound messages interleave between render passes
            while let Ok(msg) = update_rx.try_recv() {
                viz.apply(msg);
            }

            frame = viz.render_pass();
            last_pass = Instant::now();
        }

        terminal.draw(|f| draw_frame(f, &viz, &frame, group_size))?;
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    Ok(())
}
