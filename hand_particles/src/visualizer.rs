//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────┬───────────────────────────────────────────┐
//! │ GESTURE PARTICLES    │                                           │
//! │ ● STATUS: OPEN       │                                           │
//! │ [SPHERE] [HEART]     │              · ·  particle cloud  · ·     │
//! │ [CAKE]   [RING]      │                                           │
//! │ [RANDOM]             │                                           │
//! │ ■ COLOR #00ffff      │                                           │
//! │ [FULLSCREEN]         │                                           │
//! ├──────────────────────┘                                           │
//! │ key legend                                                       │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;
use std::time::Duration;

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use particle_field::{Gesture, HandSnapshot, ParticleField, Pattern, Point3, Rgb};

use crate::config::DisplayConfig;
use crate::error::AppError;
use crate::source::{SimInput, SimPose};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

const TITLE:          &str  = "Hand Particles";
const BG_COLOR:       u32   = 0xFF000000;
const PANEL_BG:       u32   = 0xFF1A1A2E;
const PANEL_BORDER:   u32   = 0xFF0F3460;
const BUTTON_BG:      u32   = 0xFF16213E;
const BUTTON_ACTIVE:  u32   = 0xFF2E5E9E;
const TEXT_COLOR:     u32   = 0xFFEEEEEE;
const HINT_COLOR:     u32   = 0xFF888888;

const PANEL_X:        usize = 12;
const PANEL_Y:        usize = 12;
const PANEL_W:        usize = 236;
const PANEL_H:        usize = 226;
const PAD:            usize = 12;
const BUTTON_W:       usize = 100;
const BUTTON_H:       usize = 24;
const BUTTON_GAP:     usize = 12;
const BUTTONS_Y:      usize = PANEL_Y + 64;
const ROW_STEP:       usize = BUTTON_H + 6;
const SWATCH_Y:       usize = BUTTONS_Y + 3 * ROW_STEP + 4;
const SWATCH_SIZE:    usize = 24;
const FULLSCREEN_Y:   usize = SWATCH_Y + SWATCH_SIZE + 12;
const FULLSCREEN_W:   usize = 2 * BUTTON_W + BUTTON_GAP;
/// Bitmap font magnification.
const TEXT_SCALE:     usize = 2;
/// Minimum depth in front of the camera that still gets drawn.
const NEAR_PLANE:     f32   = 0.1;
const HUE_STEP:       i16   = 10;

// ════════════════════════════════════════════════════════════════════════════
// Commands
// ════════════════════════════════════════════════════════════════════════════

/// Host-UI actions, produced by keys and panel clicks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiCommand {
    SelectPattern(Pattern),
    NextColor,
    /// Rotate the particle hue by this many degrees.
    ShiftHue(i16),
    ToggleFullscreen,
    Quit,
}

fn inside(x: f32, y: f32, rx: usize, ry: usize, rw: usize, rh: usize) -> bool {
    x >= rx as f32 && x < (rx + rw) as f32 && y >= ry as f32 && y < (ry + rh) as f32
}

/// Top-left corner of the `i`th pattern button.
fn pattern_button(i: usize) -> (usize, usize) {
    let x = PANEL_X + PAD + (i % 2) * (BUTTON_W + BUTTON_GAP);
    let y = BUTTONS_Y + (i / 2) * ROW_STEP;
    (x, y)
}

/// Which panel control, if any, lies under window pixel `(x, y)`.
pub fn panel_hit(x: f32, y: f32) -> Option<UiCommand> {
    for (i, pattern) in Pattern::ALL.iter().enumerate() {
        let (bx, by) = pattern_button(i);
        if inside(x, y, bx, by, BUTTON_W, BUTTON_H) {
            return Some(UiCommand::SelectPattern(*pattern));
        }
    }
    if inside(x, y, PANEL_X + PAD, SWATCH_Y, SWATCH_SIZE, SWATCH_SIZE) {
        return Some(UiCommand::NextColor);
    }
    if inside(x, y, PANEL_X + PAD, FULLSCREEN_Y, FULLSCREEN_W, BUTTON_H) {
        return Some(UiCommand::ToggleFullscreen);
    }
    None
}

// ════════════════════════════════════════════════════════════════════════════
// Camera
// ════════════════════════════════════════════════════════════════════════════

/// A particle projected onto the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub x:    f32,
    pub y:    f32,
    /// On-screen diameter in pixels.
    pub size: f32,
}

/// Perspective camera on the +z axis looking at the origin.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    width:    usize,
    height:   usize,
    focal:    f32,
    distance: f32,
}

impl Camera {
    pub fn new(width: usize, height: usize, fov_degrees: f32, distance: f32) -> Self {
        let focal = (height as f32 / 2.0) / (fov_degrees.to_radians() / 2.0).tan();
        Camera { width, height, focal, distance }
    }

    /// `None` for points at or behind the near plane.
    pub fn project(&self, p: Point3, point_size: f32) -> Option<Projected> {
        let depth = self.distance - p.z;
        if depth <= NEAR_PLANE {
            return None;
        }
        let k = self.focal / depth;
        Some(Projected {
            x:    self.width  as f32 / 2.0 + p.x * k,
            y:    self.height as f32 / 2.0 - p.y * k,
            size: (point_size * k).max(1.0),
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Canvas — ARGB framebuffer with primitive drawing
// ════════════════════════════════════════════════════════════════════════════

pub struct Canvas {
    buf:    Vec<u32>,
    width:  usize,
    height: usize,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas { buf: vec![BG_COLOR; width * height], width, height }
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn pixels(&self) -> &[u32] { &self.buf }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.buf[y * self.width + x])
    }

    pub fn clear(&mut self, color: u32) {
        self.buf.fill(color);
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.buf[y * self.width + x] = color;
        }
    }

    /// Saturating additive blend of `rgb` into one pixel.
    fn add_pixel(&mut self, x: usize, y: usize, rgb: (u32, u32, u32)) {
        if x < self.width && y < self.height {
            let i = y * self.width + x;
            self.buf[i] = add(self.buf[i], rgb);
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    /// Fill with `color` at opacity `t` over what's already there.
    fn shade_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32, t: f32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                let i = row * self.width + col;
                self.buf[i] = blend(self.buf[i], color, t);
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..x + w {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..y + h {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    fn fill_disc(&mut self, cx: usize, cy: usize, r: usize, color: u32) {
        let r2 = (r * r) as isize;
        for dy in -(r as isize)..=r as isize {
            for dx in -(r as isize)..=r as isize {
                if dx * dx + dy * dy <= r2 {
                    let (px, py) = (cx as isize + dx, cy as isize + dy);
                    if px >= 0 && py >= 0 {
                        self.set_pixel(px as usize, py as usize, color);
                    }
                }
            }
        }
    }

    /// Draw `text` in the 3×5 bitmap font, magnified by `scale`.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            if cx + 4 * scale > self.width { break; }
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += 4 * scale;
        }
    }
}

fn channels(c: u32) -> (u32, u32, u32) {
    ((c >> 16) & 0xFF, (c >> 8) & 0xFF, c & 0xFF)
}

fn add(dst: u32, (r, g, b): (u32, u32, u32)) -> u32 {
    let (dr, dg, db) = channels(dst);
    0xFF000000 | ((dr + r).min(255) << 16) | ((dg + g).min(255) << 8) | (db + b).min(255)
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t) as u32;
    let (ar, ag, ab) = channels(a);
    let (br, bg, bb) = channels(b);
    0xFF000000 | (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}

// ════════════════════════════════════════════════════════════════════════════
// Frame composition
// ════════════════════════════════════════════════════════════════════════════

/// Everything drawn in one frame.
pub struct FrameView<'a> {
    pub field:      &'a ParticleField,
    pub color:      Rgb,
    pub snapshot:   HandSnapshot,
    pub fullscreen: bool,
    /// Show the simulated-hand key legend.
    pub sim_hints:  bool,
}

pub fn status_dot_color(snapshot: &HandSnapshot) -> u32 {
    if !snapshot.is_live() {
        return 0xFF333333;
    }
    match snapshot.gesture {
        Gesture::Closed  => 0xFFFF4444,
        Gesture::Open    => 0xFF44FF44,
        Gesture::Neutral => 0xFF4488FF,
        Gesture::None    => 0xFF888888,
    }
}

pub fn status_text(snapshot: &HandSnapshot) -> String {
    if snapshot.is_live() {
        format!("STATUS: {}", snapshot.gesture.label())
    } else {
        "LOADING CAMERA...".to_string()
    }
}

pub fn draw_frame(canvas: &mut Canvas, camera: &Camera, display: &DisplayConfig, view: &FrameView) {
    canvas.clear(BG_COLOR);
    draw_particles(canvas, camera, display, view);
    draw_panel(canvas, view);
    draw_hints(canvas, view.sim_hints);
}

fn draw_particles(canvas: &mut Canvas, camera: &Camera, display: &DisplayConfig, view: &FrameView) {
    let rotation = view.field.rotation();
    let a = display.point_alpha;
    let rgb = (
        (view.color.r as f32 * a) as u32,
        (view.color.g as f32 * a) as u32,
        (view.color.b as f32 * a) as u32,
    );
    for &p in view.field.positions() {
        let Some(s) = camera.project(p.rotated(rotation.yaw, rotation.pitch), display.point_size)
        else { continue };
        let half = s.size / 2.0;
        let (x0, y0) = ((s.x - half).round(), (s.y - half).round());
        let side = s.size.round().max(1.0) as isize;
        for dy in 0..side {
            for dx in 0..side {
                let (px, py) = (x0 as isize + dx, y0 as isize + dy);
                if px >= 0 && py >= 0 {
                    canvas.add_pixel(px as usize, py as usize, rgb);
                }
            }
        }
    }
}

fn draw_panel(canvas: &mut Canvas, view: &FrameView) {
    canvas.shade_rect(PANEL_X, PANEL_Y, PANEL_W, PANEL_H, PANEL_BG, 0.85);
    canvas.draw_border(PANEL_X, PANEL_Y, PANEL_W, PANEL_H, PANEL_BORDER);

    let left = PANEL_X + PAD;
    canvas.draw_label("GESTURE PARTICLES", left, PANEL_Y + 12, TEXT_SCALE, TEXT_COLOR);

    // ── Status ────────────────────────────────────────────────────────────
    canvas.fill_disc(left + 6, PANEL_Y + 43, 6, status_dot_color(&view.snapshot));
    canvas.draw_label(&status_text(&view.snapshot), left + 20, PANEL_Y + 38, TEXT_SCALE, TEXT_COLOR);

    // ── Pattern buttons ───────────────────────────────────────────────────
    let current = view.field.pattern();
    for (i, pattern) in Pattern::ALL.iter().enumerate() {
        let (bx, by) = pattern_button(i);
        let bg = if *pattern == current { BUTTON_ACTIVE } else { BUTTON_BG };
        canvas.fill_rect(bx, by, BUTTON_W, BUTTON_H, bg);
        canvas.draw_border(bx, by, BUTTON_W, BUTTON_H, PANEL_BORDER);
        let label = format!("{} {}", i + 1, pattern.name());
        canvas.draw_label(&label, bx + 6, by + 7, TEXT_SCALE, TEXT_COLOR);
    }

    // ── Colour ────────────────────────────────────────────────────────────
    canvas.fill_rect(left, SWATCH_Y, SWATCH_SIZE, SWATCH_SIZE, view.color.to_argb());
    canvas.draw_border(left, SWATCH_Y, SWATCH_SIZE, SWATCH_SIZE, TEXT_COLOR);
    let label = format!("COLOR {}", view.color);
    canvas.draw_label(&label, left + SWATCH_SIZE + 10, SWATCH_Y + 7, TEXT_SCALE, TEXT_COLOR);

    // ── Fullscreen ────────────────────────────────────────────────────────
    let bg = if view.fullscreen { BUTTON_ACTIVE } else { BUTTON_BG };
    canvas.fill_rect(left, FULLSCREEN_Y, FULLSCREEN_W, BUTTON_H, bg);
    canvas.draw_border(left, FULLSCREEN_Y, FULLSCREEN_W, BUTTON_H, PANEL_BORDER);
    let label = if view.fullscreen { "EXIT FULLSCREEN" } else { "FULLSCREEN" };
    canvas.draw_label(label, left + 6, FULLSCREEN_Y + 7, TEXT_SCALE, TEXT_COLOR);
}

fn draw_hints(canvas: &mut Canvas, sim_hints: bool) {
    let h = canvas.height();
    canvas.draw_label(
        "1-5=pattern  C=color  LEFT/RIGHT=hue  F=fullscreen  Q=quit  fist=implode  palm=expand",
        10, h.saturating_sub(16), 1, HINT_COLOR,
    );
    if sim_hints {
        canvas.draw_label(
            "Space=show hand  Z/X/V=fist/relax/palm  wheel=reach  E=glitch  mouse=move",
            10, h.saturating_sub(28), 1, HINT_COLOR,
        );
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer — the window
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:     Window,
    canvas:     Canvas,
    camera:     Camera,
    display:    DisplayConfig,
    sim_tx:     Sender<SimInput>,
    fullscreen: bool,
    mouse_down: bool,
    pointer:    Option<(f32, f32)>,
}

fn open_window(width: usize, height: usize, fullscreen: bool) -> Result<Window, AppError> {
    let mut window = Window::new(
        TITLE,
        width, height,
        WindowOptions {
            resize:     false,
            borderless: fullscreen,
            topmost:    fullscreen,
            ..WindowOptions::default()
        },
    ).map_err(|e| AppError::Window(e.to_string()))?;

    if fullscreen {
        window.set_position(0, 0);
    }
    window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps
    Ok(window)
}

impl Visualizer {
    pub fn new(display: &DisplayConfig, sim_tx: Sender<SimInput>) -> Result<Self, AppError> {
        let window = open_window(display.width, display.height, false)?;
        Ok(Visualizer {
            window,
            canvas:     Canvas::new(display.width, display.height),
            camera:     Camera::new(display.width, display.height, display.fov_degrees, display.camera_distance),
            display:    display.clone(),
            sim_tx,
            fullscreen: false,
            mouse_down: false,
            pointer:    None,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    pub fn is_fullscreen(&self) -> bool { self.fullscreen }

    /// Recreate the window borderless at the fullscreen size, or back at the
    /// windowed size.  Projection follows the new size.
    pub fn set_fullscreen(&mut self, on: bool) -> Result<(), AppError> {
        if on == self.fullscreen { return Ok(()); }
        let (w, h) = if on {
            (self.display.fullscreen_width, self.display.fullscreen_height)
        } else {
            (self.display.width, self.display.height)
        };
        self.window = open_window(w, h, on)?;
        self.canvas = Canvas::new(w, h);
        self.camera = Camera::new(w, h, self.display.fov_degrees, self.display.camera_distance);
        self.fullscreen = on;
        self.pointer = None;
        Ok(())
    }

    /// Translate this frame's keys and clicks into [`UiCommand`]s and forward
    /// simulated-hand input to the landmark source.
    pub fn poll_input(&mut self) -> Vec<UiCommand> {
        let mut commands = Vec::new();
        if !self.window.is_open() {
            commands.push(UiCommand::Quit);
            return commands;
        }

        // Keys that trigger on first press only
        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            commands.push(UiCommand::Quit);
        }
        let digits = [Key::Key1, Key::Key2, Key::Key3, Key::Key4, Key::Key5];
        for (key, pattern) in digits.into_iter().zip(Pattern::ALL) {
            if one_shot(key) {
                commands.push(UiCommand::SelectPattern(pattern));
            }
        }
        if one_shot(Key::C) { commands.push(UiCommand::NextColor); }
        // held arrows keep turning the hue
        if self.window.is_key_pressed(Key::Left, KeyRepeat::Yes) {
            commands.push(UiCommand::ShiftHue(-HUE_STEP));
        }
        if self.window.is_key_pressed(Key::Right, KeyRepeat::Yes) {
            commands.push(UiCommand::ShiftHue(HUE_STEP));
        }
        if one_shot(Key::F) { commands.push(UiCommand::ToggleFullscreen); }

        // ── Simulated hand ────────────────────────────────────────────────
        let mut sim = Vec::new();
        if one_shot(Key::Space) { sim.push(SimInput::ToggleHand); }
        if one_shot(Key::Z)     { sim.push(SimInput::Pose(SimPose::Fist)); }
        if one_shot(Key::X)     { sim.push(SimInput::Pose(SimPose::Relaxed)); }
        if one_shot(Key::V)     { sim.push(SimInput::Pose(SimPose::Palm)); }
        if one_shot(Key::E)     { sim.push(SimInput::Glitch); }
        if let Some((_, dy)) = self.window.get_scroll_wheel() {
            if dy != 0.0 {
                sim.push(SimInput::AdjustReach(dy.signum() * 0.02));
            }
        }

        // ── Pointer ───────────────────────────────────────────────────────
        let (w, h) = (self.canvas.width() as f32, self.canvas.height() as f32);
        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            if self.pointer != Some((mx, my)) {
                self.pointer = Some((mx, my));
                sim.push(SimInput::Pointer { x: mx / w, y: my / h });
            }
        }
        let down = self.window.get_mouse_down(MouseButton::Left);
        if down && !self.mouse_down {
            if let Some(cmd) = self.pointer.and_then(|(mx, my)| panel_hit(mx, my)) {
                commands.push(cmd);
            }
        }
        self.mouse_down = down;

        for input in sim {
            // receiver is gone when the source isn't the simulator
            let _ = self.sim_tx.send(input);
        }
        commands
    }

    /// Render one frame.
    pub fn render(&mut self, view: &FrameView) -> Result<(), AppError> {
        draw_frame(&mut self.canvas, &self.camera, &self.display, view);
        self.window
            .update_with_buffer(self.canvas.pixels(), self.canvas.width(), self.canvas.height())
            .map_err(|e| AppError::Window(e.to_string()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'g' | 'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'n' | 'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'p' | 'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'q' | 'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use particle_field::{Dynamics, TrackingStatus};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn camera() -> Camera {
        Camera::new(960, 640, 75.0, 30.0)
    }

    #[test]
    fn origin_projects_to_centre() {
        let p = camera().project(Point3::ORIGIN, 0.2).unwrap();
        assert_eq!((p.x, p.y), (480.0, 320.0));
    }

    #[test]
    fn up_is_up_on_screen() {
        let p = camera().project(Point3::new(0.0, 5.0, 0.0), 0.2).unwrap();
        assert!(p.y < 320.0);
    }

    #[test]
    fn points_behind_camera_are_culled() {
        assert!(camera().project(Point3::new(0.0, 0.0, 30.0), 0.2).is_none());
        assert!(camera().project(Point3::new(0.0, 0.0, 45.0), 0.2).is_none());
    }

    #[test]
    fn nearer_points_are_larger() {
        let near = camera().project(Point3::new(0.0, 0.0, 20.0), 0.2).unwrap();
        let far  = camera().project(Point3::new(0.0, 0.0, -20.0), 0.2).unwrap();
        assert!(near.size > far.size);
        assert!(far.size >= 1.0);
    }

    #[test]
    fn panel_hits_pattern_buttons() {
        for (i, pattern) in Pattern::ALL.iter().enumerate() {
            let (x, y) = pattern_button(i);
            assert_eq!(
                panel_hit(x as f32 + 5.0, y as f32 + 5.0),
                Some(UiCommand::SelectPattern(*pattern)),
            );
        }
    }

    #[test]
    fn panel_hits_swatch_and_fullscreen() {
        let x = (PANEL_X + PAD + 2) as f32;
        assert_eq!(panel_hit(x, SWATCH_Y as f32 + 2.0), Some(UiCommand::NextColor));
        assert_eq!(panel_hit(x, FULLSCREEN_Y as f32 + 2.0), Some(UiCommand::ToggleFullscreen));
    }

    #[test]
    fn clicks_outside_panel_miss() {
        assert_eq!(panel_hit(600.0, 400.0), None);
        assert_eq!(panel_hit(1.0, 1.0), None);
    }

    #[test]
    fn controls_fit_inside_panel() {
        assert!(FULLSCREEN_Y + BUTTON_H <= PANEL_Y + PANEL_H);
        assert!(PANEL_X + PAD + FULLSCREEN_W <= PANEL_X + PANEL_W);
    }

    #[test]
    fn status_reflects_tracking_and_gesture() {
        let loading = HandSnapshot::default();
        assert_eq!(status_text(&loading), "LOADING CAMERA...");
        assert_eq!(status_dot_color(&loading), 0xFF333333);

        let open = HandSnapshot {
            gesture:  Gesture::Open,
            tracking: TrackingStatus::Live,
            ..HandSnapshot::default()
        };
        assert_eq!(status_text(&open), "STATUS: OPEN");
        assert_eq!(status_dot_color(&open), 0xFF44FF44);
    }

    #[test]
    fn additive_blend_saturates() {
        assert_eq!(add(0xFF000000, (0, 255, 255)), 0xFF00FFFF);
        assert_eq!(add(0xFF808080, (200, 0, 0)), 0xFFFF8080);
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 0.0), 0xFF000000);
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 1.0), 0xFFFFFFFF);
    }

    #[test]
    fn frame_lights_centre_pixels() {
        let mut rng = StdRng::seed_from_u64(3);
        let field = ParticleField::new(2000, Pattern::Sphere, Dynamics::default(), &mut rng).unwrap();
        let display = DisplayConfig::default();
        let cam = Camera::new(display.width, display.height, display.fov_degrees, display.camera_distance);
        let mut canvas = Canvas::new(display.width, display.height);
        let view = FrameView {
            field:      &field,
            color:      Rgb::CYAN,
            snapshot:   HandSnapshot::default(),
            fullscreen: false,
            sim_hints:  true,
        };
        draw_frame(&mut canvas, &cam, &display, &view);

        // particles start scattered around the origin; some land right of the panel
        let lit = canvas.pixels().iter()
            .enumerate()
            .filter(|&(i, &c)| i % display.width > PANEL_X + PANEL_W + 10 && c != BG_COLOR)
            .count();
        assert!(lit > 0);
        // cyan never carries red
        let px = canvas.pixel(display.width - 1, 0).unwrap();
        assert_eq!(px >> 16 & 0xFF, 0);
    }

    #[test]
    fn label_clips_at_right_edge() {
        // scale 2: glyphs start at 0, 8, 16; the third would end at 24 > 21
        let mut canvas = Canvas::new(21, 10);
        canvas.draw_label("HHHH", 0, 0, 2, TEXT_COLOR);

        // right stroke of the second glyph is the last column drawn
        assert_eq!(canvas.pixel(12, 0), Some(TEXT_COLOR));
        assert_eq!(canvas.pixel(13, 9), Some(TEXT_COLOR));

        for y in 0..canvas.height() {
            for x in 16..canvas.width() {
                assert_eq!(canvas.pixel(x, y), Some(BG_COLOR), "({x}, {y})");
            }
        }
    }
}
