//! TUI application state and logic

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;

use super::event::{Event, EventHandler};
use super::ui::Terminal;
use super::views;
use crate::domain::SidebarModel;
use crate::runtime::{Gallery, MountPhase};

/// Which panel has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Sidebar,
    Viewport,
}

impl Focus {
    fn toggle(self) -> Self {
        match self {
            Focus::Sidebar => Focus::Viewport,
            Focus::Viewport => Focus::Sidebar,
        }
    }
}

/// One selectable row of the sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub label: String,
    pub href: String,
    /// 0 = page, 1 = artifact, 2 = version
    pub depth: u8,
    pub active: bool,
}

/// Flattens the sidebar model into selectable rows
pub fn sidebar_entries(model: &SidebarModel) -> Vec<SidebarEntry> {
    let mut entries: Vec<SidebarEntry> = model
        .pages
        .iter()
        .map(|page| SidebarEntry {
            label: page.title.to_string(),
            href: page.href.to_string(),
            depth: 0,
            active: page.active,
        })
        .collect();

    for artifact in &model.artifacts {
        entries.push(SidebarEntry {
            label: artifact.title.clone(),
            href: artifact.href.clone(),
            depth: 1,
            active: artifact.active,
        });
        entries.extend(artifact.versions.iter().map(|v| SidebarEntry {
            label: v.label.clone(),
            href: v.href.clone(),
            depth: 2,
            active: v.active,
        }));
    }

    entries
}

/// Application state
pub struct App {
    gallery: Gallery,

    focus: Focus,

    /// Selected sidebar row
    sidebar_index: usize,

    /// Expand stack traces on the failure panel
    show_stack: bool,

    should_quit: bool,
}

impl App {
    pub fn new(gallery: Gallery, start_route: &str, show_stack: bool) -> Self {
        let mut app = Self {
            gallery,
            focus: Focus::Sidebar,
            sidebar_index: 0,
            show_stack,
            should_quit: false,
        };
        app.navigate(start_route);
        app
    }

    /// Run the main application loop
    pub fn run(&mut self, terminal: &mut Terminal, events: EventHandler) -> Result<()> {
        while !self.should_quit {
            self.gallery.poll();
            terminal.draw(|frame| self.draw(frame))?;

            match events.next()? {
                Event::Key(key) => self.handle_key(key),
                Event::Resize => {}
                Event::Tick => self.gallery.tick(),
            }
        }

        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        views::shell::draw(frame, self);
    }

    fn navigate(&mut self, path: &str) {
        let route = self.gallery.navigate(path).path();
        let entries = self.entries();
        if let Some(index) = entries.iter().position(|e| e.href == route) {
            self.sidebar_index = index;
        } else {
            self.sidebar_index = self.sidebar_index.min(entries.len().saturating_sub(1));
        }
    }

    /// Handle key events
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.focus == Focus::Viewport && self.gallery.handle_key(key) {
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab => self.focus = self.focus.toggle(),
            KeyCode::Esc => self.focus = Focus::Sidebar,
            KeyCode::Char('R') => self.gallery.reload(),
            KeyCode::Char('g') => self.navigate("/"),
            KeyCode::Char('p') => {
                if let Some(previous) = self.gallery.previous_version_path() {
                    self.navigate(&previous);
                }
            }
            KeyCode::Char('s') if self.gallery.phase() == Some(MountPhase::Failed) => {
                self.show_stack = !self.show_stack;
            }
            _ if self.focus == Focus::Sidebar => self.handle_sidebar_key(key),
            _ => {}
        }
    }

    fn handle_sidebar_key(&mut self, key: KeyEvent) {
        let len = self.entries().len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.sidebar_index + 1 < len {
                    self.sidebar_index += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.sidebar_index = self.sidebar_index.saturating_sub(1);
            }
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                if let Some(entry) = self.entries().get(self.sidebar_index).cloned() {
                    self.navigate(&entry.href);
                    if self.gallery.route().is_artifact() {
                        self.focus = Focus::Viewport;
                    }
                }
            }
            _ => {}
        }
    }

    /// Blocks until the pending load settles
    #[cfg(test)]
    pub fn settle(&mut self, timeout: std::time::Duration) {
        self.gallery.wait_for_load(timeout);
    }

    pub fn entries(&self) -> Vec<SidebarEntry> {
        sidebar_entries(&self.gallery.sidebar())
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn gallery_mut(&mut self) -> &mut Gallery {
        &mut self.gallery
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn sidebar_index(&self) -> usize {
        self.sidebar_index
    }

    pub fn show_stack(&self) -> bool {
        self.show_stack
    }

    #[cfg(test)]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
