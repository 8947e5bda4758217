//! Key binding definitions shown in the help panel.

/// Where a binding applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    Global,
    Controls,
    Search,
    Results,
}

impl KeyContext {
    pub fn title(self) -> &'static str {
        match self {
            KeyContext::Global => "Global",
            KeyContext::Controls => "Query controls",
            KeyContext::Search => "Search box",
            KeyContext::Results => "Results",
        }
    }
}

/// A single documented binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybinding {
    pub keys: &'static str,
    pub description: &'static str,
    pub context: KeyContext,
}

const fn binding(keys: &'static str, description: &'static str, context: KeyContext) -> Keybinding {
    Keybinding {
        keys,
        description,
        context,
    }
}

const BINDINGS: &[Keybinding] = &[
    binding("Tab / S-Tab", "Next / previous control", KeyContext::Global),
    binding("m", "Load more (retries after an error)", KeyContext::Global),
    binding("r", "Refresh loaded pages", KeyContext::Global),
    binding("/", "Jump to the search box", KeyContext::Global),
    binding("t", "Switch dark / light theme", KeyContext::Global),
    binding("?", "Toggle this help", KeyContext::Global),
    binding("q / Ctrl+C", "Quit", KeyContext::Global),
    binding("Enter / Space", "Open selector or toggle", KeyContext::Controls),
    binding("Left / Right", "Previous / next option", KeyContext::Controls),
    binding("h / l", "Previous / next option", KeyContext::Controls),
    binding("Up / Down", "Move in an open selector", KeyContext::Controls),
    binding("j / k", "Move in an open selector", KeyContext::Controls),
    binding("Esc", "Close selector", KeyContext::Controls),
    binding("Enter", "Commit search text", KeyContext::Search),
    binding("Esc", "Discard search edit", KeyContext::Search),
    binding("Tab", "Commit and leave", KeyContext::Search),
    binding("Up / Down", "Move up / down", KeyContext::Results),
    binding("j / k", "Move down / up", KeyContext::Results),
    binding("g / G", "First / last issue", KeyContext::Results),
    binding("Ctrl+d / Ctrl+u", "Page down / up", KeyContext::Results),
    binding("Enter / o", "Open issue in browser", KeyContext::Results),
];

/// Bindings grouped by context, in display order.
///
/// With vim mode off the j/k/h/l rows are dropped, matching the keys the
/// widgets accept.
pub fn keybindings_grouped(vim_mode: bool) -> Vec<(KeyContext, Vec<Keybinding>)> {
    let contexts = [
        KeyContext::Global,
        KeyContext::Controls,
        KeyContext::Search,
        KeyContext::Results,
    ];
    contexts
        .into_iter()
        .map(|context| {
            let bindings = BINDINGS
                .iter()
                .filter(|b| b.context == context)
                .filter(|b| vim_mode || !is_vim_binding(b))
                .cloned()
                .collect();
            (context, bindings)
        })
        .collect()
}

fn is_vim_binding(binding: &Keybinding) -> bool {
    matches!(binding.keys, "j / k" | "h / l")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouped_in_order() {
        let grouped = keybindings_grouped(true);
        let contexts: Vec<_> = grouped.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            contexts,
            vec![
                KeyContext::Global,
                KeyContext::Controls,
                KeyContext::Search,
                KeyContext::Results
            ]
        );
        let total: usize = grouped.iter().map(|(_, b)| b.len()).sum();
        assert_eq!(total, BINDINGS.len());
    }

    #[test]
    fn test_vim_bindings_hidden_without_vim_mode() {
        let grouped = keybindings_grouped(false);
        assert!(grouped
            .iter()
            .flat_map(|(_, b)| b.iter())
            .all(|b| b.keys != "j / k" && b.keys != "h / l"));
    }

    #[test]
    fn test_load_more_is_documented() {
        let grouped = keybindings_grouped(true);
        let global = &grouped[0].1;
        assert!(global.iter().any(|b| b.keys == "m"));
    }

    #[test]
    fn test_search_has_own_section() {
        let grouped = keybindings_grouped(false);
        let global = &grouped[0].1;
        assert!(global.iter().any(|b| b.keys == "/"));
        assert!(global.iter().any(|b| b.keys == "t"));

        let (context, search) = &grouped[2];
        assert_eq!(*context, KeyContext::Search);
        assert!(search.iter().any(|b| b.keys == "Enter"));
        assert!(search.iter().any(|b| b.keys == "Esc"));
        assert!(!grouped[1].1.iter().any(|b| b.description.contains("search")));
    }

    #[test]
    fn test_arrow_rows_kept_without_vim_mode() {
        let grouped = keybindings_grouped(false);
        let controls = &grouped[1].1;
        assert!(controls.iter().any(|b| b.keys == "Left / Right"));
        assert!(controls.iter().any(|b| b.keys == "Up / Down"));
    }
}
