// main.rs - window, input, egui overlay around the orb sphere

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // 在 Release 模式下隐藏控制台窗口

use clap::Parser;
use moonr_orb::assets::AssetLoader;
use moonr_orb::config::OrbConfig;
use moonr_orb::host::Host;
use moonr_orb::i18n;
use moonr_orb::picker::SurfaceRect;
use moonr_orb::renderer::Renderer;
use moonr_orb::scene::OrbScene;
use moonr_orb::selection::SelectionState;
use moonr_orb::spots::SpotCatalog;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    dpi::{LogicalSize, PhysicalPosition},
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowBuilder},
};

/// Pointer travel (px) below which a press/release counts as a click.
const CLICK_SLOP: f64 = 4.0;

#[derive(Parser, Debug)]
#[command(name = "moonr-orb", version, about = "Interactive sphere of image orbs")]
struct Args {
    /// JSON file with sphere settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding img1.png .. imgN.png
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Spot catalog (spotData.json)
    #[arg(long)]
    spots: Option<PathBuf>,

    /// Total number of orbs
    #[arg(long)]
    items: Option<usize>,

    /// Number of leading orbs with image content
    #[arg(long)]
    images: Option<usize>,

    /// UI language (en, zh-Hans, ja)
    #[arg(long)]
    lang: Option<String>,
}

/// Requests collected while drawing the overlay, applied after the frame.
enum UiAction {
    ResetView,
    ToggleFullscreen,
    SetBorders(bool),
    Search(String),
    ClearSelection,
    SetLanguage(String),
}

struct UiState {
    search_text: String,
    search_invalid: bool,
    show_fps: bool,
    is_fullscreen: bool,
    current_lang: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn load_config(args: &Args) -> Result<(OrbConfig, SpotCatalog), moonr_orb::error::ConfigError> {
    let mut config = match &args.config {
        Some(path) => OrbConfig::load(path)?,
        None => OrbConfig::default(),
    };
    let catalog = match &args.spots {
        Some(path) => SpotCatalog::load(path)?,
        None => SpotCatalog::default(),
    };

    if let Some(dir) = &args.assets {
        config.asset_dir = dir.clone();
    }
    if let Some(n) = args.items {
        config.total_items = n;
    }
    match args.images {
        Some(n) => config.total_images = n,
        None if !catalog.is_empty() => config.total_images = catalog.len(),
        None => {}
    }
    config.validate()?;
    Ok((config, catalog))
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let (config, catalog) = load_config(&args)?;

    let current_lang = i18n::resolve_lang(args.lang.as_deref());
    i18n::init(current_lang.clone());

    let event_loop = EventLoop::new();
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(i18n::tr("app.title"))
            .with_inner_size(LogicalSize::new(1280, 720))
            .build(&event_loop)?,
    );

    let mut renderer = pollster::block_on(Renderer::new(window.clone()))?;
    let size = window.inner_size();

    let start = Instant::now();
    let mut host = Host::default();
    let mut selection = SelectionState::new(config.total_items);
    let mut scene = OrbScene::mount(
        config,
        AssetLoader::from_files(),
        &mut host,
        (size.width, size.height),
        0.0,
    )?;

    // 交互状态
    let mut mouse_pressed = false;
    let mut press_pos: Option<PhysicalPosition<f64>> = None;
    let mut last_mouse_pos: Option<PhysicalPosition<f64>> = None;
    let mut cursor_pos = PhysicalPosition::new(0.0, 0.0);
    let mut dragged = false;

    // FPS 计算
    let mut last_fps_time = Instant::now();
    let mut frame_count = 0;
    let mut fps = 0.0;

    let mut ui = UiState {
        search_text: String::new(),
        search_invalid: false,
        show_fps: false,
        is_fullscreen: false,
        current_lang,
    };

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent { event, .. } => {
                // 先让 egui 处理事件
                let response = renderer.egui_state.on_event(&renderer.egui_ctx, &event);
                if response.consumed {
                    return;
                }

                match event {
                    WindowEvent::CloseRequested => {
                        scene.teardown(&mut host);
                        renderer.release_scene();
                        *control_flow = ControlFlow::Exit;
                    }

                    WindowEvent::Resized(new_size) => {
                        renderer.resize(new_size);
                        scene.resize(new_size.width, new_size.height);
                    }

                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        renderer.resize(*new_inner_size);
                        scene.resize(new_inner_size.width, new_inner_size.height);
                    }

                    WindowEvent::KeyboardInput { input, .. } => {
                        if input.state == ElementState::Pressed {
                            match input.virtual_keycode {
                                Some(VirtualKeyCode::F11) => {
                                    toggle_fullscreen(&window, &mut ui.is_fullscreen);
                                }
                                Some(VirtualKeyCode::Escape) => {
                                    selection.clear();
                                    ui.search_text.clear();
                                }
                                _ => {}
                            }
                        }
                    }

                    WindowEvent::MouseInput { state, button, .. } => {
                        if button == MouseButton::Left {
                            mouse_pressed = state == ElementState::Pressed;
                            if mouse_pressed {
                                press_pos = Some(cursor_pos);
                                last_mouse_pos = Some(cursor_pos);
                                dragged = false;
                            } else {
                                if !dragged && press_pos.is_some() {
                                    let rect = SurfaceRect::from_size(
                                        renderer.size.width as f32,
                                        renderer.size.height as f32,
                                    );
                                    scene.handle_click(
                                        cursor_pos.x as f32,
                                        cursor_pos.y as f32,
                                        &rect,
                                        &mut selection,
                                    );
                                    ui.search_text = selection.search_value();
                                }
                                press_pos = None;
                                last_mouse_pos = None;
                            }
                        }
                    }

                    WindowEvent::CursorMoved { position, .. } => {
                        cursor_pos = position;
                        if mouse_pressed {
                            if let Some(origin) = press_pos {
                                let (mx, my) = (position.x - origin.x, position.y - origin.y);
                                if (mx * mx + my * my).sqrt() > CLICK_SLOP {
                                    dragged = true;
                                }
                            }
                            if let Some(last_pos) = last_mouse_pos {
                                let dx = (position.x - last_pos.x) as f32;
                                let dy = (position.y - last_pos.y) as f32;
                                scene
                                    .controls_mut()
                                    .rotate_by_pixels(dx, dy, renderer.size.height as f32);
                            }
                            last_mouse_pos = Some(position);
                        }
                    }

                    WindowEvent::MouseWheel { delta, .. } => {
                        let scroll = match delta {
                            MouseScrollDelta::LineDelta(_, y) => y,
                            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 20.0,
                        };
                        scene.controls_mut().zoom(scroll);
                    }

                    _ => {}
                }
            }

            Event::RedrawRequested(_) => {
                frame_count += 1;
                let now_instant = Instant::now();
                let elapsed = now_instant.duration_since(last_fps_time).as_secs_f32();
                if elapsed >= 1.0 {
                    fps = frame_count as f32 / elapsed;
                    frame_count = 0;
                    last_fps_time = now_instant;
                }

                let now = start.elapsed().as_secs_f64();
                scene.sync_selection(selection.selected(), &mut host, now);
                scene.frame(&mut host, now);
                renderer.prepare(&scene);

                let mut actions = Vec::new();
                let render_result = renderer.render_with_ui(&window, |ctx| {
                    draw_ui(ctx, &mut ui, &mut actions, &scene, &selection, &catalog, fps);
                });

                for action in actions {
                    match action {
                        UiAction::ResetView => scene.reset_view(&mut host),
                        UiAction::ToggleFullscreen => toggle_fullscreen(&window, &mut ui.is_fullscreen),
                        UiAction::SetBorders(show) => {
                            let config = OrbConfig {
                                show_borders: show,
                                ..scene.config().clone()
                            };
                            if let Err(e) = scene.rebuild(config, &mut host, now) {
                                log::warn!("rebuild rejected: {e}");
                            }
                            selection.set_total_items(scene.config().total_items);
                        }
                        UiAction::Search(query) => {
                            ui.search_invalid = !selection.search(&query);
                        }
                        UiAction::ClearSelection => {
                            selection.clear();
                            ui.search_text.clear();
                            ui.search_invalid = false;
                        }
                        UiAction::SetLanguage(lang) => {
                            i18n::init(lang.clone());
                            ui.current_lang = lang;
                            window.set_title(&i18n::tr("app.title"));
                        }
                    }
                }

                match render_result {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("GPU out of memory, exiting");
                        *control_flow = ControlFlow::Exit;
                    }
                    Err(e) => log::warn!("render error: {e:?}"),
                }
            }

            Event::MainEventsCleared => {
                window.request_redraw();
            }

            _ => {}
        }
    })
}

fn toggle_fullscreen(window: &Window, is_fullscreen: &mut bool) {
    *is_fullscreen = !*is_fullscreen;
    if *is_fullscreen {
        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
    } else {
        window.set_fullscreen(None);
    }
}

fn draw_ui(
    ctx: &egui::Context,
    ui_state: &mut UiState,
    actions: &mut Vec<UiAction>,
    scene: &OrbScene,
    selection: &SelectionState,
    catalog: &SpotCatalog,
    fps: f32,
) {
    let total_items = scene.config().total_items;
    let max = [("max", total_items.to_string())];

    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            // View
            ui.menu_button(i18n::tr("menu.view"), |ui| {
                if ui.button(i18n::tr("view.reset")).clicked() {
                    actions.push(UiAction::ResetView);
                    ui.close_menu();
                }

                let fullscreen_label = if ui_state.is_fullscreen {
                    i18n::tr("view.fullscreen.exit")
                } else {
                    i18n::tr("view.fullscreen.enter")
                };
                if ui.button(fullscreen_label).clicked() {
                    actions.push(UiAction::ToggleFullscreen);
                    ui.close_menu();
                }

                ui.separator();
                if ui.checkbox(&mut ui_state.show_fps, i18n::tr("view.show_fps")).clicked() {
                    ui.close_menu();
                }
                let mut show_borders = scene.config().show_borders;
                if ui.checkbox(&mut show_borders, i18n::tr("view.show_borders")).clicked() {
                    actions.push(UiAction::SetBorders(show_borders));
                    ui.close_menu();
                }
            });

            // Language
            ui.menu_button(i18n::tr("menu.language"), |ui| {
                let langs: [(&str, &str); 3] = [("en", "English"), ("zh-Hans", "简体中文"), ("ja", "日本語")];
                for (code, name) in langs {
                    if ui.radio(ui_state.current_lang == code, name).clicked() {
                        actions.push(UiAction::SetLanguage(code.to_string()));
                        ui.close_menu();
                    }
                }
            });

            ui.separator();

            // Search
            let edit = ui.add(
                egui::TextEdit::singleline(&mut ui_state.search_text)
                    .hint_text(i18n::tr_with("search.placeholder", &max))
                    .desired_width(160.0),
            );
            let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button(i18n::tr("search.go")).clicked() || submitted {
                actions.push(UiAction::Search(ui_state.search_text.clone()));
            }
            if selection.has_selection() && ui.button(i18n::tr("selection.clear")).clicked() {
                actions.push(UiAction::ClearSelection);
            }
            if ui_state.search_invalid {
                ui.label(egui::RichText::new(i18n::tr_with("search.invalid", &max)).color(egui::Color32::LIGHT_RED));
            }
        });
    });

    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let pending = scene.pending_assets();
            if pending > 0 {
                ui.label(
                    egui::RichText::new(i18n::tr_with("status.loading", &[("n", pending.to_string())]))
                        .color(egui::Color32::YELLOW),
                );
                ui.label("|");
            }

            ui.label(format!("{}: {}", i18n::tr("status.total_spots"), total_items));
            ui.label("|");
            ui.label(format!("{}: {}", i18n::tr("status.spots_taken"), scene.config().content_count()));
            ui.label("|");

            let active = match selection.selected_spot_number() {
                Some(n) => format!("#{n} {}", catalog.display_name(n)),
                None => i18n::tr("status.none"),
            };
            ui.label(format!("{}: {}", i18n::tr("status.active_spot"), active));

            if catalog.total_views > 0 {
                ui.label("|");
                ui.label(format!("{}: {}", i18n::tr("status.total_views"), catalog.total_views));
            }

            if ui_state.show_fps {
                ui.label("|");
                ui.label(egui::RichText::new(format!("FPS: {:.1}", fps)).color(egui::Color32::GREEN));
            }
        });
    });
}
