//! Internationalization (i18n) module.
//!
//! Provides localized strings for the application UI and CLI output.
//! English is the default language; Spanish is available as an alternative.

use std::sync::OnceLock;

static CURRENT_LANG: OnceLock<Lang> = OnceLock::new();

/// Supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    /// English (default)
    En,
    /// Spanish
    Es,
}

impl Lang {
    /// Parse a language code string (e.g. "en", "es", "en_US", "es_ES").
    /// Returns `None` for unrecognized codes.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.to_lowercase();
        let prefix = normalized.split(['_', '-', '.']).next().unwrap_or("");
        match prefix {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }

    /// Return the ISO 639-1 code for this language.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }
}

/// Initialize the global language. Call once at startup.
/// If already initialized, this is a no-op.
pub fn set_lang(lang: Lang) {
    let _ = CURRENT_LANG.set(lang);
}

/// Get the currently configured language (defaults to English).
pub fn lang() -> Lang {
    CURRENT_LANG.get().copied().unwrap_or(Lang::En)
}

/// Detect language from `EMLSHELL_LANG`, `LC_MESSAGES` or `LANG`.
pub fn detect_system_lang() -> Lang {
    ["EMLSHELL_LANG", "LC_MESSAGES", "LANG"]
        .iter()
        .find_map(|var| std::env::var(var).ok().and_then(|v| Lang::from_code(&v)))
        .unwrap_or(Lang::En)
}

/// Macro for defining translatable message functions.
/// Each function returns a `&'static str` based on the current language.
macro_rules! msg {
    ($name:ident, $en:expr, $es:expr) => {
        /// Returns a localized string for the current language.
        pub fn $name() -> &'static str {
            match lang() {
                Lang::En => $en,
                Lang::Es => $es,
            }
        }
    };
}

// ── General ──────────────────────────────────────────────────────

msg!(app_name, "emlShell", "emlShell");
msg!(
    app_about,
    "emlShell \u{2014} Terminal viewer for .eml messages. Read headers and the sanitized body, download or open attachments, and browse forwarded messages.",
    "emlShell \u{2014} Visor de terminal para mensajes .eml. Lee cabeceras y el cuerpo saneado, descarga o abre adjuntos y navega por mensajes reenviados."
);
msg!(
    app_long_about,
    "emlShell \u{2014} Terminal viewer for .eml messages.\nDrop a file onto the terminal, read the message, and download\nor open its attachments, including nested messages. Built in Rust.",
    "emlShell \u{2014} Visor de terminal para mensajes .eml.\nArrastra un fichero a la terminal, lee el mensaje y descarga\no abre sus adjuntos, incluidos los mensajes anidados. Escrito en Rust."
);
msg!(
    app_after_help,
    "Examples:\n  emlshell message.eml\n  emlshell show message.eml --json\n  emlshell attachments message.eml -o ./out",
    "Ejemplos:\n  emlshell mensaje.eml\n  emlshell show mensaje.eml --json\n  emlshell attachments mensaje.eml -o ./salida"
);

// ── CLI help strings ─────────────────────────────────────────────

msg!(
    help_cmd_open,
    "Open a file in the TUI (default if no subcommand given)",
    "Abrir un fichero en la TUI (por defecto si no se da subcomando)"
);
msg!(
    help_cmd_show,
    "Print the rendered message to stdout",
    "Mostrar el mensaje renderizado por la salida est\u{e1}ndar"
);
msg!(
    help_cmd_source,
    "Print the raw message source",
    "Mostrar el c\u{f3}digo fuente del mensaje"
);
msg!(
    help_cmd_attachments,
    "Download every attachment of a message",
    "Descargar todos los adjuntos de un mensaje"
);
msg!(
    help_cmd_completions,
    "Generate shell completions",
    "Generar autocompletado para la shell"
);
msg!(help_cmd_manpage, "Generate a man page", "Generar p\u{e1}gina de manual");

// ── Errors ───────────────────────────────────────────────────────

msg!(err_file_not_found, "File not found", "Fichero no encontrado");
msg!(
    err_not_eml,
    "Not an .eml file",
    "No es un fichero .eml"
);
msg!(
    err_too_many_files,
    "Only one file can be dropped at a time",
    "Solo se puede soltar un fichero cada vez"
);

// ── Message viewer ───────────────────────────────────────────────

msg!(no_subject, "No subject", "Sin asunto");
msg!(no_name, "No name", "Sin nombre");
msg!(no_text, "No text", "Sin texto");
msg!(invalid_date, "Invalid Date", "Fecha no v\u{e1}lida");
msg!(label_to, "To:", "Para:");
msg!(label_cc, "CC:", "CC:");
msg!(error_title, "Error", "Error");
msg!(
    error_unparsed,
    "Unable to parse the EML file, email source is displayed below.",
    "No se pudo analizar el fichero EML, se muestra su c\u{f3}digo fuente."
);
msg!(source_title, "Email Source", "C\u{f3}digo fuente");
msg!(view_source, "View Source", "Ver fuente");
msg!(action_download, "Download", "Descargar");
msg!(action_view, "View", "Ver");
msg!(loading, "Loading message\u{2026}", "Cargando mensaje\u{2026}");

/// `strftime` pattern for the short localized date.
pub fn date_pattern() -> &'static str {
    match lang() {
        Lang::En => "%m/%d/%Y",
        Lang::Es => "%d/%m/%Y",
    }
}

/// Unit used by [`time_ago`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

/// Relative time phrase such as `"3 days ago"` or `"in 2 hours"`.
pub fn time_ago(count: i64, unit: TimeUnit, future: bool) -> String {
    let one = count == 1;
    let word = match (lang(), unit) {
        (Lang::En, TimeUnit::Minute) => if one { "minute" } else { "minutes" },
        (Lang::En, TimeUnit::Hour) => if one { "hour" } else { "hours" },
        (Lang::En, TimeUnit::Day) => if one { "day" } else { "days" },
        (Lang::En, TimeUnit::Month) => if one { "month" } else { "months" },
        (Lang::En, TimeUnit::Year) => if one { "year" } else { "years" },
        (Lang::Es, TimeUnit::Minute) => if one { "minuto" } else { "minutos" },
        (Lang::Es, TimeUnit::Hour) => if one { "hora" } else { "horas" },
        (Lang::Es, TimeUnit::Day) => if one { "d\u{ed}a" } else { "d\u{ed}as" },
        (Lang::Es, TimeUnit::Month) => if one { "mes" } else { "meses" },
        (Lang::Es, TimeUnit::Year) => if one { "a\u{f1}o" } else { "a\u{f1}os" },
    };
    match (lang(), future) {
        (Lang::En, false) => format!("{count} {word} ago"),
        (Lang::En, true) => format!("in {count} {word}"),
        (Lang::Es, false) => format!("hace {count} {word}"),
        (Lang::Es, true) => format!("dentro de {count} {word}"),
    }
}

msg!(just_now, "just now", "ahora mismo");

// ── Page / drop zone ─────────────────────────────────────────────

msg!(page_title, "View Message", "Ver mensaje");
msg!(drop_title, "Load Message", "Cargar mensaje");
msg!(
    drop_message,
    "Drag an EML file onto this window or press o to type a path",
    "Arrastra un fichero EML a esta ventana o pulsa o para escribir una ruta"
);
msg!(drop_rejected, "Rejected", "Rechazado");
msg!(prompt_path, "Open .eml: ", "Abrir .eml: ");

// ── TUI ──────────────────────────────────────────────────────────

msg!(tui_attachments, "Attachments", "Adjuntos");
msg!(tui_help_title, " Help ", " Ayuda ");
msg!(tui_saved, "Saved", "Guardado");
msg!(tui_opened, "Opened", "Abierto");
msg!(tui_error, "Error", "Error");
msg!(tui_loading_file, "Reading", "Leyendo");
msg!(tui_hint_scroll, "scroll", "desplazar");
msg!(tui_hint_attach, "attachment", "adjunto");
msg!(tui_hint_actions, "actions", "acciones");
msg!(tui_hint_download, "download", "descargar");
msg!(tui_hint_view, "view", "ver");
msg!(tui_hint_source, "source", "fuente");
msg!(tui_hint_open, "open file", "abrir fichero");
msg!(tui_hint_close, "close", "cerrar");
msg!(tui_hint_help, "help", "ayuda");
msg!(tui_hint_quit, "quit", "salir");
msg!(tui_hint_submit, "open", "abrir");
msg!(tui_hint_cancel, "cancel", "cancelar");
msg!(tui_hint_close_menu, "close menu", "cerrar men\u{fa}");
msg!(tui_hint_top, "top", "inicio");
msg!(
    tui_help_description,
    "Drop an .eml file onto the terminal or press o to type its path.",
    "Suelta un fichero .eml en la terminal o pulsa o para escribir su ruta."
);
msg!(tui_help_message, "Message", "Mensaje");
msg!(tui_help_general, "General", "General");
msg!(tui_no_message, "No message loaded", "Ning\u{fa}n mensaje cargado");

// ── CLI strings ─────────────────────────────────────────────────

msg!(
    cli_no_attachments,
    "The message has no attachments.",
    "El mensaje no tiene adjuntos."
);
msg!(cli_downloading, "Downloading", "Descargando");
msg!(cli_downloaded, "Downloaded", "Descargado");
msg!(cli_attachments_to, "attachment(s) to", "adjunto(s) en");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_from_code() {
        assert_eq!(Lang::from_code("en"), Some(Lang::En));
        assert_eq!(Lang::from_code("es"), Some(Lang::Es));
        assert_eq!(Lang::from_code("en_US.UTF-8"), Some(Lang::En));
        assert_eq!(Lang::from_code("es-MX"), Some(Lang::Es));
        assert_eq!(Lang::from_code("fr"), None);
    }

    #[test]
    fn test_lang_code_roundtrip() {
        assert_eq!(Lang::En.code(), "en");
        assert_eq!(Lang::Es.code(), "es");
    }

    #[test]
    fn test_time_ago_english() {
        if lang() != Lang::En {
            return;
        }
        assert_eq!(time_ago(1, TimeUnit::Day, false), "1 day ago");
        assert_eq!(time_ago(3, TimeUnit::Hour, false), "3 hours ago");
        assert_eq!(time_ago(2, TimeUnit::Year, true), "in 2 years");
    }

    #[test]
    fn test_messages_return_strings() {
        assert!(!app_name().is_empty());
        assert!(!app_about().is_empty());
        assert!(!no_subject().is_empty());
        assert!(!err_file_not_found().is_empty());
    }
}
