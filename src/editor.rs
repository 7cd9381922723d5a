use atomic_float::AtomicF32;
use nih_plug::prelude::{util, Editor, GuiContext};
use nih_plug_iced::widgets as nih_widgets;
use nih_plug_iced::*;
use std::sync::Arc;
use std::time::Duration;

use crate::params::IirFiltersParams;

pub(crate) fn default_state() -> Arc<IcedState> {
    IcedState::from_size(400, 360)
}

pub(crate) fn create(
    params: Arc<IirFiltersParams>,
    peak_meter: Arc<AtomicF32>,
    editor_state: Arc<IcedState>,
) -> Option<Box<dyn Editor>> {
    create_iced_editor::<IirFiltersEditor>(editor_state, (params, peak_meter))
}

struct IirFiltersEditor {
    params: Arc<IirFiltersParams>,
    context: Arc<dyn GuiContext>,

    peak_meter: Arc<AtomicF32>,

    filter_type_slider_state: nih_widgets::param_slider::State,
    cutoff_slider_state: nih_widgets::param_slider::State,
    q_slider_state: nih_widgets::param_slider::State,
    gain_slider_state: nih_widgets::param_slider::State,
    peak_meter_state: nih_widgets::peak_meter::State,
}

#[derive(Debug, Clone, Copy)]
enum Message {
    ParamUpdate(nih_widgets::ParamMessage),
}

impl IcedEditor for IirFiltersEditor {
    type Executor = executor::Default;
    type Message = Message;
    type InitializationFlags = (Arc<IirFiltersParams>, Arc<AtomicF32>);

    fn new(
        (params, peak_meter): Self::InitializationFlags,
        context: Arc<dyn GuiContext>,
    ) -> (Self, Command<Self::Message>) {
        let editor = IirFiltersEditor {
            params,
            context,

            peak_meter,

            filter_type_slider_state: Default::default(),
            cutoff_slider_state: Default::default(),
            q_slider_state: Default::default(),
            gain_slider_state: Default::default(),
            peak_meter_state: Default::default(),
        };

        (editor, Command::none())
    }

    fn context(&self) -> &dyn GuiContext {
        self.context.as_ref()
    }

    fn update(
        &mut self,
        _window: &mut WindowQueue,
        message: Self::Message,
    ) -> Command<Self::Message> {
        match message {
            Message::ParamUpdate(message) => self.handle_param_message(message),
        }

        Command::none()
    }

    fn view(&mut self) -> Element<'_, Self::Message> {
        let algorithm = self.params.filter_type.value();
        let gain_hint = if algorithm.uses_gain() {
            format!("{}: gain active", self.params.filter_type)
        } else {
            format!("{}: gain has no effect", self.params.filter_type)
        };

        Column::new()
            .align_items(Alignment::Center)
            .padding(20)
            .spacing(10)
            .push(
                Text::new("IIR Filters")
                    .font(assets::NOTO_SANS_LIGHT)
                    .size(24)
                    .height(30.into())
                    .width(Length::Fill)
                    .horizontal_alignment(alignment::Horizontal::Center)
                    .vertical_alignment(alignment::Vertical::Bottom),
            )
            .push(control_row(
                "Type",
                nih_widgets::ParamSlider::new(
                    &mut self.filter_type_slider_state,
                    &self.params.filter_type,
                )
                .map(Message::ParamUpdate),
            ))
            .push(
                Text::new(gain_hint)
                    .size(12)
                    .color(Color::from_rgb(0.45, 0.45, 0.45)),
            )
            .push(control_row(
                "Cutoff",
                nih_widgets::ParamSlider::new(&mut self.cutoff_slider_state, &self.params.cutoff)
                    .map(Message::ParamUpdate),
            ))
            .push(control_row(
                "Q",
                nih_widgets::ParamSlider::new(&mut self.q_slider_state, &self.params.q)
                    .map(Message::ParamUpdate),
            ))
            .push(control_row(
                "Gain",
                nih_widgets::ParamSlider::new(&mut self.gain_slider_state, &self.params.gain)
                    .map(Message::ParamUpdate),
            ))
            .push(Space::with_height(20.into()))
            .push(
                nih_widgets::PeakMeter::new(
                    &mut self.peak_meter_state,
                    util::gain_to_db(self.peak_meter.load(std::sync::atomic::Ordering::Relaxed)),
                )
                .hold_time(Duration::from_millis(600)),
            )
            .into()
    }

    fn background_color(&self) -> nih_plug_iced::Color {
        nih_plug_iced::Color {
            r: 0.98,
            g: 0.98,
            b: 0.98,
            a: 1.0,
        }
    }
}

/// A fixed-width label followed by its slider.
fn control_row<'a>(label: &str, slider: Element<'a, Message>) -> Row<'a, Message> {
    Row::new()
        .align_items(Alignment::Center)
        .spacing(10)
        .push(Text::new(label).size(14).width(Length::Units(60)))
        .push(slider)
}
