/// Full-screen pages the show moves through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Start,
    Tree,
    Album,
    Fireworks,
}

impl Page {
    const ALL: [Page; 4] = [Page::Start, Page::Tree, Page::Album, Page::Fireworks];

    fn index(self) -> usize {
        self as usize
    }
}

/// Visibility toggles for each page. Styling is the renderer's business.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stage {
    active: [bool; 4],
}

impl Stage {
    /// Only the start page is showing.
    pub fn new() -> Self {
        let mut stage = Self { active: [false; 4] };
        stage.activate(Page::Start);
        stage
    }

    pub fn activate(&mut self, page: Page) {
        self.active[page.index()] = true;
    }

    pub fn deactivate(&mut self, page: Page) {
        self.active[page.index()] = false;
    }

    pub fn is_active(&self, page: Page) -> bool {
        self.active[page.index()]
    }

    /// The foremost visible page; later pages cover earlier ones.
    pub fn front(&self) -> Option<Page> {
        Page::ALL.into_iter().rev().find(|page| self.is_active(*page))
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_pages() {
        let mut stage = Stage::new();
        assert_eq!(stage.front(), Some(Page::Start));

        stage.deactivate(Page::Start);
        assert_eq!(stage.front(), None);

        stage.activate(Page::Tree);
        stage.activate(Page::Album);
        assert_eq!(stage.front(), Some(Page::Album));
        assert!(stage.is_active(Page::Tree));
    }
}
