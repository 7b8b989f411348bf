//! Navigation history for screen transitions

use super::state::Screen;

/// Router manages navigation history
#[derive(Debug)]
pub struct Router {
    history: Vec<Screen>,
    max_depth: usize,
}

impl Router {
    /// Start at `root`
    pub fn new(root: Screen) -> Self {
        Self {
            history: vec![root],
            max_depth: 20,
        }
    }

    /// Navigate to `screen`, keeping the current one for `back`
    pub fn push(&mut self, screen: Screen) {
        if self.current() == screen {
            return;
        }
        if self.history.len() >= self.max_depth {
            self.history.remove(1);
        }
        self.history.push(screen);
    }

    /// Swap the current screen without leaving history (splash to home)
    pub fn replace(&mut self, screen: Screen) {
        match self.history.last_mut() {
            Some(last) => *last = screen,
            None => self.history.push(screen),
        }
    }

    /// Go back to the previous screen; stays put at the root
    pub fn back(&mut self) -> Screen {
        if self.can_go_back() {
            self.history.pop();
        }
        self.current()
    }

    pub fn current(&self) -> Screen {
        self.history.last().copied().unwrap_or_default()
    }

    /// Titles from the root to the current screen
    pub fn breadcrumb(&self) -> Vec<&'static str> {
        self.history.iter().map(|s| s.title()).collect()
    }

    pub fn can_go_back(&self) -> bool {
        self.history.len() > 1
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Screen::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splash_is_replaced_not_stacked() {
        let mut router = Router::default();
        assert_eq!(router.current(), Screen::Loading);

        router.replace(Screen::Home);
        router.push(Screen::TrackOrder);
        assert_eq!(router.back(), Screen::Home);
        assert_eq!(router.back(), Screen::Home);
        assert!(!router.can_go_back());
    }

    #[test]
    fn test_push_and_breadcrumb() {
        let mut router = Router::new(Screen::Home);
        router.push(Screen::TrackOrder);
        router.push(Screen::TrackOrder);
        router.push(Screen::Signature);

        assert_eq!(
            router.breadcrumb(),
            vec!["Home", "Track Order", "Digital Signature"]
        );
        assert_eq!(router.back(), Screen::TrackOrder);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut router = Router::new(Screen::Home);
        for i in 0..50 {
            router.push(if i % 2 == 0 {
                Screen::TrackOrder
            } else {
                Screen::Signature
            });
        }
        assert_eq!(router.breadcrumb().len(), 20);
        assert_eq!(router.breadcrumb()[0], "Home");
    }
}
