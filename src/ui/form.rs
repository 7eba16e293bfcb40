use super::Emitted;
use crate::form::{self, FormOutcome, FormState};

pub struct FormView {
    form: FormState,
}

impl FormView {
    pub fn new(form: FormState) -> Self {
        Self { form }
    }

    pub fn show(&mut self, ctx: &egui::Context, emit: &mut dyn FnMut(Emitted)) {
        let mut outcome = None;

        egui::TopBottomPanel::bottom("form_buttons").show(ctx, |ui| {
            if let Some(ref msg) = self.form.error_message {
                ui.colored_label(egui::Color32::from_rgb(0xef, 0x44, 0x44), msg);
            }
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    outcome = Some(self.form.cancel());
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Save").clicked() {
                        outcome = Some(self.form.submit());
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                let titles: Vec<String> = self.form.tabs().iter().map(|t| t.title()).collect();
                for (i, title) in titles.into_iter().enumerate() {
                    if ui
                        .selectable_label(self.form.active_tab() == i, title)
                        .clicked()
                    {
                        self.form.select_tab(i);
                    }
                }
            });
            ui.separator();

            let Some(tab) = self.form.tabs().get(self.form.active_tab()).cloned() else {
                return;
            };
            egui::ScrollArea::vertical().show(ui, |ui| {
                for field in &tab.fields {
                    ui.label(egui::RichText::new(form::title(&field.name)).strong());
                    if self.form.is_switch(&field.name) {
                        let mut checked = self.form.checked(&field.path);
                        if ui.checkbox(&mut checked, "").changed() {
                            self.form.set_checked(&field.path, checked);
                        }
                    } else {
                        let mut text = self.form.value(&field.path);
                        let edit = egui::TextEdit::singleline(&mut text)
                            .desired_width(f32::INFINITY);
                        if ui.add(edit).changed() {
                            self.form.set_value(&field.path, text);
                        }
                    }
                    ui.add_space(6.0);
                }
            });
        });

        match outcome {
            Some(FormOutcome::Saved(values)) => {
                log::info!("form saved");
                emit(Emitted::FormSaved { values });
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            Some(FormOutcome::Cancelled) => {
                log::info!("form cancelled");
                emit(Emitted::FormCancelled);
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            None => {}
        }
    }
}
