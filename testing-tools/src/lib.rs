// Testing Tools Library
//
// Black-box scenarios run against a live (or mocked) PetFriends service:
// - fixtures: photo files and pet data used by the scenarios
// - output: progress lines and the PASS/FAIL summary
// - scenarios: the scenario catalogue and the suite that runs it

pub mod fixtures;
pub mod output;
pub mod scenarios;
