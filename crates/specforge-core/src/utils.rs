//! String transformation utilities for typings generation

/// Convert a string to UpperCamelCase (PascalCase).
///
/// Word boundaries are non-alphanumeric characters and lower-to-upper case
/// transitions; all non-leading letters of a word are lowercased.
pub fn to_upper_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut start_of_word = true;
    let mut prev_is_lowercase = false;

    for ch in s.chars() {
        if !ch.is_alphanumeric() {
            start_of_word = true;
            prev_is_lowercase = false;
            continue;
        }
        if ch.is_uppercase() && prev_is_lowercase {
            start_of_word = true;
        }
        if start_of_word {
            result.extend(ch.to_uppercase());
            start_of_word = false;
        } else {
            result.extend(ch.to_lowercase());
        }
        prev_is_lowercase = ch.is_lowercase();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_upper_camel_case() {
        assert_eq!(to_upper_camel_case("pet"), "Pet");
        assert_eq!(to_upper_camel_case("pet_tag"), "PetTag");
        assert_eq!(to_upper_camel_case("findPetsByStatus"), "FindPetsByStatus");
        assert_eq!(to_upper_camel_case("find-pets-by-status"), "FindPetsByStatus");
        assert_eq!(to_upper_camel_case("FIND_PETS_BY_STATUS"), "FindPetsByStatus");
        assert_eq!(to_upper_camel_case("api.response"), "ApiResponse");
        assert_eq!(to_upper_camel_case(""), "");
    }
}
