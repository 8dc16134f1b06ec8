use crate::model::MaterialReplacement;
use crate::valuation::ReplacementMap;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{DefaultTerminal, Frame};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Review,
    Summary,
}

/// Interactive approval of material replacements.
///
/// Each material has a choice index: 0 keeps the original name, `n` picks
/// the n-th suggestion.
pub struct ReviewApp {
    pub materials: Vec<MaterialReplacement>,
    pub choices: Vec<usize>,
    pub view: View,
    pub selected: usize,
    pub should_quit: bool,
    pub approved: bool,
}

impl ReviewApp {
    /// Starts every material on its proposed replacement, if it has one.
    #[must_use]
    pub fn new(materials: Vec<MaterialReplacement>) -> Self {
        let choices = materials
            .iter()
            .map(|m| {
                m.replacement
                    .as_ref()
                    .and_then(|r| m.suggestions.iter().position(|s| s == r))
                    .map_or(0, |i| i + 1)
            })
            .collect();

        Self {
            materials,
            choices,
            view: View::Review,
            selected: 0,
            should_quit: false,
            approved: false,
        }
    }

    /// Runs until the user confirms (`Some(map)`) or quits (`None`).
    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<Option<ReplacementMap>> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_events()?;
        }
        Ok(self.approved.then(|| self.approved_map()))
    }

    fn draw(&self, frame: &mut Frame) {
        match self.view {
            View::Review => super::dashboard::draw_review(frame, self),
            View::Summary => super::dashboard::draw_summary(frame, self),
        }
    }

    fn handle_events(&mut self) -> Result<()> {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                self.handle_key(key.code);
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match self.view {
            View::Review => self.handle_review_keys(code),
            View::Summary => self.handle_summary_keys(code),
        }
    }

    fn handle_review_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.previous_material(),
            KeyCode::Down | KeyCode::Char('j') => self.next_material(),
            KeyCode::Left | KeyCode::Char('h') => self.previous_choice(),
            KeyCode::Right | KeyCode::Char('l') => self.next_choice(),
            KeyCode::Enter => self.view = View::Summary,
            _ => {}
        }
    }

    fn handle_summary_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Backspace => self.view = View::Review,
            KeyCode::Enter | KeyCode::Char('y') => {
                self.approved = true;
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn previous_material(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn next_material(&mut self) {
        if self.selected < self.materials.len().saturating_sub(1) {
            self.selected += 1;
        }
    }

    /// Cycles backwards through "keep" and the suggestions (wrap around)
    fn previous_choice(&mut self) {
        let count = self.option_count(self.selected);
        if let Some(choice) = self.choices.get_mut(self.selected) {
            *choice = if *choice == 0 { count - 1 } else { *choice - 1 };
        }
    }

    /// Cycles forwards through "keep" and the suggestions (wrap around)
    fn next_choice(&mut self) {
        let count = self.option_count(self.selected);
        if let Some(choice) = self.choices.get_mut(self.selected) {
            *choice = (*choice + 1) % count;
        }
    }

    /// Keep-original plus one per suggestion.
    #[must_use]
    pub fn option_count(&self, index: usize) -> usize {
        self.materials.get(index).map_or(1, |m| m.suggestions.len() + 1)
    }

    /// Label of option `option` for material `index`.
    #[must_use]
    pub fn option_label(&self, index: usize, option: usize) -> &str {
        let Some(material) = self.materials.get(index) else {
            return "";
        };
        match option {
            0 => material.original.as_str(),
            n => material
                .suggestions
                .get(n - 1)
                .map_or(material.original.as_str(), String::as_str),
        }
    }

    /// Name material `index` will end up with.
    #[must_use]
    pub fn chosen_name(&self, index: usize) -> &str {
        let choice = self.choices.get(index).copied().unwrap_or(0);
        self.option_label(index, choice)
    }

    /// Only materials whose chosen name differs from the original.
    #[must_use]
    pub fn approved_map(&self) -> ReplacementMap {
        self.materials
            .iter()
            .enumerate()
            .filter(|(i, m)| self.chosen_name(*i) != m.original)
            .map(|(i, m)| (m.original.clone(), self.chosen_name(i).to_string()))
            .collect()
    }

    #[must_use]
    pub fn selected_material(&self) -> Option<&MaterialReplacement> {
        self.materials.get(self.selected)
    }
}
