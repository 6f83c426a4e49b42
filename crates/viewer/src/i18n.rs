use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lang {
    #[default]
    En,
    Ru,
}

static CURRENT_LANG: AtomicU8 = AtomicU8::new(0); // 0=En (default)

pub fn lang() -> Lang {
    match CURRENT_LANG.load(Ordering::Relaxed) {
        1 => Lang::Ru,
        _ => Lang::En,
    }
}

pub fn set_lang(l: Lang) {
    CURRENT_LANG.store(
        match l {
            Lang::En => 0,
            Lang::Ru => 1,
        },
        Ordering::Relaxed,
    );
}

/// Translate a key to the current language.
pub fn t(key: &str) -> &'static str {
    let ru = lang() == Lang::Ru;
    match key {
        // ── Main menus ──────────────────────────────────────
        "menu.file" => if ru { "Файл" } else { "File" },
        "menu.open" => if ru { "Открыть модель..." } else { "Open Model..." },
        "menu.open_title" => if ru { "Открыть glTF модель" } else { "Open glTF Model" },
        "menu.reload" => if ru { "Перезагрузить модель" } else { "Reload model" },
        "menu.quit" => if ru { "Выход" } else { "Quit" },

        "menu.view" => if ru { "Вид" } else { "View" },
        "menu.reset_camera" => if ru { "Сбросить камеру" } else { "Reset camera" },
        "menu.grid" => if ru { "Сетка" } else { "Grid" },
        "menu.language" => if ru { "Язык" } else { "Language" },

        // ── Customize panel ─────────────────────────────────
        "panel.title" => if ru { "🎨 Настройка модели" } else { "🎨 Customize Model" },
        "panel.pick_color" => if ru { "Цвет платья:" } else { "Pick Dress Color:" },
        "panel.ok" => if ru { "OK" } else { "OK" },
        "panel.rotate" => if ru { "Вращать" } else { "Rotate" },
        "panel.move" => if ru { "Анимация" } else { "Move" },
        "panel.pending" => if ru { "Не применён" } else { "Not applied" },

        // ── Status bar ──────────────────────────────────────
        "status.loading" => if ru { "Загрузка модели..." } else { "Loading model..." },
        "status.no_model" => if ru { "Модель не загружена" } else { "No model loaded" },
        "status.load_failed" => if ru { "Ошибка загрузки" } else { "Load failed" },
        "status.color" => if ru { "Цвет" } else { "Color" },
        "status.animating" => if ru { "Анимация" } else { "Animating" },
        "status.rotating" => if ru { "Вращение" } else { "Rotating" },
        "status.clip" => if ru { "Клип" } else { "Clip" },
        "status.no_clip" => if ru { "нет клипов" } else { "no clips" },

        // ── Fallback ────────────────────────────────────────
        _ => "???",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_language() {
        set_lang(Lang::Ru);
        assert_eq!(t("menu.file"), "Файл");
        set_lang(Lang::En);
        assert_eq!(t("menu.file"), "File");
        assert_eq!(t("panel.rotate"), "Rotate");
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(t("no.such.key"), "???");
    }
}
