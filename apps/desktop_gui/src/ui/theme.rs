//! Light/dark visuals. Cosmetic only; theming never touches upload state.


pub fn accent(dark_mode: bool) -> egui::Color32 {
    if dark_mode {
        egui::Color32::from_rgb(102, 153, 255)
    } else {
        egui::Color32::from_rgb(28, 92, 214)
    }
}

pub fn success(dark_mode: bool) -> egui::Color32 {
    if dark_mode {
        egui::Color32::from_rgb(82, 196, 128)
    } else {
        egui::Color32::from_rgb(22, 130, 62)
    }
}

pub fn apply(ctx: &egui::Context, dark_mode: bool) {
    let mut visuals = if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    visuals.hyperlink_color = accent(dark_mode);

    let mut style = (*ctx.style()).clone();
    style.visuals = visuals;
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 6.0);
    ctx.set_style(style);
}
