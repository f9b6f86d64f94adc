use std::path::PathBuf;

/// Fragment of the page the service returns for unknown credentials.
pub const UNKNOWN_USER_MESSAGE: &str = "This user wasn&#x27;t found in database";

/// Field values sent when creating or updating a pet.
#[derive(Debug, Clone, Copy)]
pub struct PetData {
    pub name: &'static str,
    pub animal_type: &'static str,
    pub age: &'static str,
}

pub const PERSIK: PetData = PetData {
    name: "Persik",
    animal_type: "cat",
    age: "5",
};

pub const PERSIK_WITH_PHOTO: PetData = PetData {
    name: "Персик",
    animal_type: "кот",
    age: "5",
};

/// Filler pet created when a scenario needs one of our own and there is none.
pub const LEBOWSKI: PetData = PetData {
    name: "Лебовски",
    animal_type: "котяра",
    age: "4",
};

pub const PUSIK: PetData = PetData {
    name: "Пусик",
    animal_type: "киса",
    age: "2",
};

pub const BLANK: PetData = PetData {
    name: "",
    animal_type: "",
    age: "",
};

/// Photo files uploaded by the scenarios, resolved against one directory.
#[derive(Debug, Clone)]
pub struct Fixtures {
    images_dir: PathBuf,
}

impl Fixtures {
    pub fn new(images_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
        }
    }

    pub fn photo(&self) -> PathBuf {
        self.images_dir.join("original.jpg")
    }

    pub fn alternate_photo(&self) -> PathBuf {
        self.images_dir.join("oboi-kot-zevaet.jpg")
    }

    /// A text file the service should refuse as a pet photo.
    pub fn not_a_photo(&self) -> PathBuf {
        self.images_dir.join("test.txt")
    }
}
