//! TUI rendering — one dashboard, five panels.
//!
//! ┌──────────────────────────────────────────────────────────┐
//! │  CyberWatch   Breach Attempt   HIGH   risk 87   ▶        │
//! ├───────────────────────────────┬──────────────────────────┤
//! │  Network Topology             │  Scenario                │
//! │   SOC                         │  anomaly 95 · rate 14    │
//! │    ●───●───●───●  packets,    ├──────────────────────────┤
//! │    beams, heat shading        │  Risk Gauge  [#####  87] │
//! │   ●    ●    ●                 │  auth/network/data bars  │
//! ├───────────────────────────────┤──────────────────────────┤
//! │  Audit Log                    │  Auth Flow strip         │
//! │  Risk computed: 87            │  Server Rack lights      │
//! ├───────────────────────────────┴──────────────────────────┤
//! │  q quit  space pause  s step  r burst  c risk  t tour    │
//! └──────────────────────────────────────────────────────────┘

use ratatui::{
    prelude::*,
    widgets::{
        Block, Borders, Gauge, List, ListItem, Paragraph, Wrap,
        canvas::{Canvas, Circle, Context, Line as CanvasLine, Points},
    },
};

use cyberwatch_core::{AuditPhase, Engine, RiskTier, SignalColor};

use super::app::App;

/// World bounds of the topology space.
const WORLD_W: f64 = 440.0;
const WORLD_H: f64 = 220.0;

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(12),   // main
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_title(f, rows[0], app);
    draw_main(f, rows[1], app);
    draw_keys(f, rows[2]);
}

/// Panels with no usable area are skipped silently.
fn degenerate(area: Rect) -> bool {
    area.width < 2 || area.height < 2
}

fn tier_color(tier: RiskTier) -> Color {
    match tier {
        RiskTier::High => Color::Red,
        RiskTier::Elevated => Color::Yellow,
        RiskTier::Low => Color::Cyan,
    }
}

fn signal_color(color: SignalColor) -> Color {
    match color {
        SignalColor::Cyan => Color::Cyan,
        SignalColor::Amber => Color::Yellow,
        SignalColor::Red => Color::Red,
    }
}

fn draw_title(f: &mut Frame, area: Rect, app: &App) {
    if degenerate(area) {
        return;
    }
    let engine = app.engine();
    let scenario = engine.scenario();
    let stats = engine.stats();

    let state = if engine.tour_running() {
        " TOUR"
    } else if engine.playing() {
        ""
    } else {
        " PAUSED"
    };

    let status = app.status().map(|s| format!("  {s}")).unwrap_or_default();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(vec![
            Span::styled(" CyberWatch ", Style::default().bold().fg(Color::Cyan)),
            Span::raw("  "),
            Span::styled(&scenario.title, Style::default().bold().fg(Color::White)),
            Span::raw("  threat "),
            Span::styled(
                scenario.threat_level.to_string(),
                Style::default().bold().fg(tier_color(engine.tier())),
            ),
            Span::styled(
                format!(
                    "  sessions {}  alerts {}  {}ms{state}{status} ",
                    stats.sessions,
                    stats.alerts,
                    engine.latency_ms()
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

    f.render_widget(block, area);
}

fn draw_main(f: &mut Frame, area: Rect, app: &App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(8)])
        .split(cols[0]);

    draw_network(f, left[0], app);
    draw_audit(f, left[1], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // scenario
            Constraint::Length(8), // risk
            Constraint::Length(5), // flow
            Constraint::Min(4),    // rack
        ])
        .split(cols[1]);

    draw_scenario(f, right[0], app);
    draw_risk(f, right[1], app);
    draw_flow(f, right[2], app);
    draw_rack(f, right[3], app);
}

fn draw_network(f: &mut Frame, area: Rect, app: &App) {
    if degenerate(area) {
        return;
    }
    let engine = app.engine();

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Network Topology "),
        )
        .x_bounds([0.0, WORLD_W])
        .y_bounds([0.0, WORLD_H])
        .paint(|ctx| paint_network(ctx, engine));

    f.render_widget(canvas, area);
}

fn paint_network(ctx: &mut Context, engine: &Engine) {
    let topo = engine.topology();
    let now = engine.clock_ms();

    // Edges first, dimmest layer.
    for edge in topo.edges() {
        if let Some((a, b)) = topo.endpoints(edge) {
            ctx.draw(&CanvasLine {
                x1: a.x,
                y1: WORLD_H - a.y,
                x2: b.x,
                y2: WORLD_H - b.y,
                color: Color::DarkGray,
            });
        }
    }

    // Heat shading under everything that moves.
    for h in engine.heat() {
        let color = if h.intensity >= 0.75 {
            Color::Cyan
        } else if h.intensity >= 0.3 {
            Color::Blue
        } else {
            Color::DarkGray
        };
        ctx.draw(&Points {
            coords: &[(h.x, WORLD_H - h.y)],
            color,
        });
    }

    // Beams fade from their color to gray.
    for b in engine.beams() {
        let color = if b.alpha(now) > 0.5 {
            signal_color(b.color)
        } else {
            Color::DarkGray
        };
        ctx.draw(&CanvasLine {
            x1: b.x1,
            y1: WORLD_H - b.y1,
            x2: b.x2,
            y2: WORLD_H - b.y2,
            color,
        });
    }

    for p in engine.packets() {
        ctx.draw(&Points {
            coords: &[(p.x, WORLD_H - p.y)],
            color: signal_color(p.color),
        });
    }

    for node in topo.nodes() {
        ctx.draw(&Circle {
            x: node.x,
            y: WORLD_H - node.y,
            radius: 5.0,
            color: Color::Cyan,
        });
        ctx.print(
            node.x + 8.0,
            WORLD_H - node.y,
            Line::styled(node.label.clone(), Style::default().fg(Color::White)),
        );
    }
}

fn draw_audit(f: &mut Frame, area: Rect, app: &App) {
    if degenerate(area) {
        return;
    }
    let engine = app.engine();
    let now = engine.clock_ms();

    let items: Vec<ListItem> = engine
        .audit()
        .iter()
        .map(|e| {
            let style = match e.phase(now) {
                AuditPhase::Visible => Style::default().fg(Color::White),
                AuditPhase::Fading => Style::default().fg(Color::DarkGray),
            };
            ListItem::new(Line::styled(format!("▸ {}", e.text), style))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Audit Log ({} total) ", engine.audit().total_pushed())),
    );
    f.render_widget(list, area);
}

fn draw_scenario(f: &mut Frame, area: Rect, app: &App) {
    if degenerate(area) {
        return;
    }
    let scenario = app.engine().scenario();

    let text = vec![
        Line::from(Span::styled(
            &scenario.title,
            Style::default().bold().fg(Color::Cyan),
        )),
        Line::from(Span::styled(
            scenario.description.clone(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("anomaly ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{:.0}", scenario.anomaly_score)),
            Span::styled("  rate ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{:.0}", app.engine().packet_rate())),
            Span::styled("  surface ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{:.0}%", scenario.heatmap_intensity * 100.0)),
        ]),
    ];

    let p = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Scenario (1-3) "));
    f.render_widget(p, area);
}

fn draw_risk(f: &mut Frame, area: Rect, app: &App) {
    if degenerate(area) {
        return;
    }
    let engine = app.engine();

    let block = Block::default().borders(Borders::ALL).title(" Risk Metrics ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    if degenerate(inner) {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // gauge
            Constraint::Length(1), // spacer
            Constraint::Length(1), // auth
            Constraint::Length(1), // network
            Constraint::Length(1), // data
        ])
        .split(inner);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(tier_color(engine.tier())))
        .ratio((engine.gauge() / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.0} {}", engine.gauge(), engine.tier()));
    f.render_widget(gauge, rows[0]);

    let profile = engine.scenario().risk_profile;
    for (row, label, value) in [
        (rows[2], "auth", profile.auth),
        (rows[3], "net ", profile.network),
        (rows[4], "data", profile.data),
    ] {
        if degenerate(row) {
            continue;
        }
        let bar = Gauge::default()
            .gauge_style(Style::default().fg(tier_color(RiskTier::from_value(value))))
            .ratio((value / 100.0).clamp(0.0, 1.0))
            .label(format!("{label} {value:.0}"));
        f.render_widget(bar, row);
    }
}

fn draw_flow(f: &mut Frame, area: Rect, app: &App) {
    if degenerate(area) {
        return;
    }
    let flow = app.engine().flow();

    let mut spans = Vec::new();
    for (i, step) in flow.steps().iter().enumerate() {
        let style = if i == flow.index() {
            Style::default().bold().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", i + 1), style));
    }
    let marker = if flow.playing() { "▶" } else { "⏸" };
    spans.push(Span::styled(
        format!(" {marker} {}", flow.current().title),
        Style::default().fg(Color::White),
    ));

    let text = vec![
        Line::from(spans),
        Line::from(Span::styled(
            flow.current().details,
            Style::default().fg(Color::Gray),
        )),
    ];

    let p = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Auth Flow (f/n) "));
    f.render_widget(p, area);
}

fn draw_rack(f: &mut Frame, area: Rect, app: &App) {
    if degenerate(area) {
        return;
    }
    let engine = app.engine();
    let t = engine.clock_ms() / 400.0;
    let load = f64::from(engine.stats().sessions) / 100.0;

    let mut lines = Vec::new();
    for i in 0..4 {
        let phase = t + f64::from(i) * 0.6;
        let mut spans = vec![Span::styled(
            format!(" rack-{:02} ", i + 1),
            Style::default().fg(Color::Gray),
        )];
        for j in 0..8 {
            let on = (phase + f64::from(j) * 0.9).sin() > 1.0 - 2.0 * load;
            let style = if on {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled("▮", style));
        }
        lines.push(Line::from(spans));
    }

    let p = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Server Rack "),
    );
    f.render_widget(p, area);
}

fn draw_keys(f: &mut Frame, area: Rect) {
    if area.width < 2 {
        return;
    }
    let bar = Paragraph::new(
        " q quit   space pause   s step   r burst   c risk   1-3 scenario   +/- rate   f flow   n next   t tour   e export",
    )
    .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(bar, area);
}
