use egui::{include_image, Image, ImageSource, TextureOptions};

pub fn load_image(src: ImageSource) -> Image<'_> {
    Image::new(src).texture_options(TextureOptions::LINEAR)
}

pub fn mine_image() -> Image<'static> {
    load_image(include_image!("../assets/mine.svg"))
}

pub fn flag_image() -> Image<'static> {
    load_image(include_image!("../assets/flag.svg"))
}

pub fn face_images() -> [Image<'static>; 5] {
    [
        load_image(include_image!("../assets/face-smile.svg")),
        load_image(include_image!("../assets/face-pressed.svg")),
        load_image(include_image!("../assets/face-click.svg")),
        load_image(include_image!("../assets/face-won.svg")),
        load_image(include_image!("../assets/face-lost.svg")),
    ]
}
