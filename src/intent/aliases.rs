/// Program-alias table: spoken program names to launchable paths.
///
/// Declaration order matters: the first entry wins when several aliases
/// prefix-match the same query.
#[derive(Debug, Clone)]
pub struct ProgramAliases {
    entries: Vec<(String, String)>,
}

impl ProgramAliases {
    pub fn new<I, A, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (A, P)>,
        A: AsRef<str>,
        P: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(alias, path)| (alias.as_ref().trim().to_lowercase(), path.into()))
                .collect(),
        }
    }

    /// Exact alias first, then either-direction prefix match.
    /// `None` when nothing resolves; callers decide how to fall back.
    pub fn resolve(&self, query: &str) -> Option<&str> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }

        if let Some((_, path)) = self.entries.iter().find(|(alias, _)| *alias == query) {
            return Some(path);
        }

        self.entries
            .iter()
            .find(|(alias, _)| alias.starts_with(&query) || query.starts_with(alias.as_str()))
            .map(|(_, path)| path.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ProgramAliases {
    #[cfg(windows)]
    fn default() -> Self {
        Self::new([
            ("notepad", r"C:\Windows\Notepad.exe"),
            ("bloc de notas", r"C:\Windows\Notepad.exe"),
            ("block de notas", r"C:\Windows\Notepad.exe"),
            ("explorer", r"C:\Windows\explorer.exe"),
            ("explorador", r"C:\Windows\explorer.exe"),
            ("word", r"C:\Program Files\Microsoft Office\root\Office16\WINWORD.EXE"),
            ("excel", r"C:\Program Files\Microsoft Office\root\Office16\EXCEL.EXE"),
            ("powershell", r"C:\Windows\System32\WindowsPowerShell\v1.0\powershell.exe"),
            ("cmd", r"C:\Windows\System32\cmd.exe"),
            ("consola", r"C:\Windows\System32\cmd.exe"),
            ("terminal", r"C:\Windows\System32\cmd.exe"),
            ("paint", r"C:\Windows\System32\mspaint.exe"),
            ("pintura", r"C:\Windows\System32\mspaint.exe"),
            ("calculadora", r"C:\Windows\System32\calc.exe"),
            ("calculator", r"C:\Windows\System32\calc.exe"),
            ("firefox", r"C:\Program Files\Mozilla Firefox\firefox.exe"),
            ("chrome", r"C:\Program Files\Google\Chrome\Application\chrome.exe"),
            ("edge", r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe"),
        ])
    }

    #[cfg(not(windows))]
    fn default() -> Self {
        Self::new([
            ("notepad", "gedit"),
            ("bloc de notas", "gedit"),
            ("block de notas", "gedit"),
            ("explorer", "nautilus"),
            ("explorador", "nautilus"),
            ("word", "libreoffice --writer"),
            ("excel", "libreoffice --calc"),
            ("powershell", "pwsh"),
            ("cmd", "x-terminal-emulator"),
            ("consola", "x-terminal-emulator"),
            ("terminal", "x-terminal-emulator"),
            ("paint", "pinta"),
            ("pintura", "pinta"),
            ("calculadora", "gnome-calculator"),
            ("calculator", "gnome-calculator"),
            ("firefox", "firefox"),
            ("chrome", "google-chrome"),
            ("edge", "microsoft-edge"),
        ])
    }
}
